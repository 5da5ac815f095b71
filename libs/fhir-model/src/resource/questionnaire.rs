//! `Questionnaire` with its recursive items.

use crate::builder::finish;
use crate::error::Result;
use crate::resource::{backbone_element, domain_resource, DomainResourceFields, ResourceFields};
use crate::types::element::BackboneFields;
use crate::types::{
    AnswerOptionValue, Boolean, Canonical, Code, Coding, Date, DateTime, Element, EnableWhenAnswer,
    FhirString, Identifier, Integer, Markdown, Period, Uri,
};
use crate::validation::{require_choice_element, require_non_null, require_value_or_children};
use crate::visitor::{structural_hash, Fields};

/// A structured set of questions.
///
/// Items nest to any depth through [`Item::item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Questionnaire {
    hash: u64,
    resource: ResourceFields,
    domain: DomainResourceFields,
    url: Option<Uri>,
    identifier: Vec<Identifier>,
    version: Option<FhirString>,
    name: Option<FhirString>,
    title: Option<FhirString>,
    derived_from: Vec<Canonical>,
    status: Code,
    experimental: Option<Boolean>,
    subject_type: Vec<Code>,
    date: Option<DateTime>,
    publisher: Option<FhirString>,
    description: Option<Markdown>,
    purpose: Option<Markdown>,
    copyright: Option<Markdown>,
    approval_date: Option<Date>,
    last_review_date: Option<Date>,
    effective_period: Option<Period>,
    code: Vec<Coding>,
    item: Vec<Item>,
}

impl Questionnaire {
    pub fn builder(status: impl Into<Option<Code>>) -> QuestionnaireBuilder {
        QuestionnaireBuilder {
            resource: ResourceFields::default(),
            domain: DomainResourceFields::default(),
            url: None,
            identifier: Vec::new(),
            version: None,
            name: None,
            title: None,
            derived_from: Vec::new(),
            status: status.into(),
            experimental: None,
            subject_type: Vec::new(),
            date: None,
            publisher: None,
            description: None,
            purpose: None,
            copyright: None,
            approval_date: None,
            last_review_date: None,
            effective_period: None,
            code: Vec::new(),
            item: Vec::new(),
        }
    }

    pub fn to_builder(&self) -> QuestionnaireBuilder {
        QuestionnaireBuilder::from(self)
    }

    pub fn url(&self) -> Option<&Uri> {
        self.url.as_ref()
    }

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }

    pub fn version(&self) -> Option<&FhirString> {
        self.version.as_ref()
    }

    pub fn name(&self) -> Option<&FhirString> {
        self.name.as_ref()
    }

    pub fn title(&self) -> Option<&FhirString> {
        self.title.as_ref()
    }

    pub fn derived_from(&self) -> &[Canonical] {
        &self.derived_from
    }

    pub fn status(&self) -> &Code {
        &self.status
    }

    pub fn experimental(&self) -> Option<&Boolean> {
        self.experimental.as_ref()
    }

    pub fn subject_type(&self) -> &[Code] {
        &self.subject_type
    }

    pub fn date(&self) -> Option<&DateTime> {
        self.date.as_ref()
    }

    pub fn publisher(&self) -> Option<&FhirString> {
        self.publisher.as_ref()
    }

    pub fn description(&self) -> Option<&Markdown> {
        self.description.as_ref()
    }

    pub fn purpose(&self) -> Option<&Markdown> {
        self.purpose.as_ref()
    }

    pub fn copyright(&self) -> Option<&Markdown> {
        self.copyright.as_ref()
    }

    pub fn approval_date(&self) -> Option<&Date> {
        self.approval_date.as_ref()
    }

    pub fn last_review_date(&self) -> Option<&Date> {
        self.last_review_date.as_ref()
    }

    pub fn effective_period(&self) -> Option<&Period> {
        self.effective_period.as_ref()
    }

    pub fn code(&self) -> &[Coding] {
        &self.code
    }

    pub fn item(&self) -> &[Item] {
        &self.item
    }
}

domain_resource!(
    Questionnaire,
    QuestionnaireBuilder,
    |q| Fields::new()
        .domain_resource(&q.resource, &q.domain)
        .opt("url", q.url.as_ref())
        .many("identifier", &q.identifier)
        .opt("version", q.version.as_ref())
        .opt("name", q.name.as_ref())
        .opt("title", q.title.as_ref())
        .many("derivedFrom", &q.derived_from)
        .one("status", &q.status)
        .opt("experimental", q.experimental.as_ref())
        .many("subjectType", &q.subject_type)
        .opt("date", q.date.as_ref())
        .opt("publisher", q.publisher.as_ref())
        .opt("description", q.description.as_ref())
        .opt("purpose", q.purpose.as_ref())
        .opt("copyright", q.copyright.as_ref())
        .opt("approvalDate", q.approval_date.as_ref())
        .opt("lastReviewDate", q.last_review_date.as_ref())
        .opt("effectivePeriod", q.effective_period.as_ref())
        .many("code", &q.code)
        .many("item", &q.item)
        .build()
);

#[derive(Debug, Clone)]
pub struct QuestionnaireBuilder {
    resource: ResourceFields,
    domain: DomainResourceFields,
    url: Option<Uri>,
    identifier: Vec<Identifier>,
    version: Option<FhirString>,
    name: Option<FhirString>,
    title: Option<FhirString>,
    derived_from: Vec<Canonical>,
    status: Option<Code>,
    experimental: Option<Boolean>,
    subject_type: Vec<Code>,
    date: Option<DateTime>,
    publisher: Option<FhirString>,
    description: Option<Markdown>,
    purpose: Option<Markdown>,
    copyright: Option<Markdown>,
    approval_date: Option<Date>,
    last_review_date: Option<Date>,
    effective_period: Option<Period>,
    code: Vec<Coding>,
    item: Vec<Item>,
}

impl QuestionnaireBuilder {
    pub fn url(mut self, url: impl Into<Option<Uri>>) -> Self {
        self.url = url.into();
        self
    }

    pub fn identifier(mut self, identifier: impl IntoIterator<Item = Identifier>) -> Self {
        self.identifier.extend(identifier);
        self
    }

    pub fn set_identifier(mut self, identifier: impl IntoIterator<Item = Identifier>) -> Self {
        self.identifier = identifier.into_iter().collect();
        self
    }

    pub fn version(mut self, version: impl Into<Option<FhirString>>) -> Self {
        self.version = version.into();
        self
    }

    pub fn name(mut self, name: impl Into<Option<FhirString>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn title(mut self, title: impl Into<Option<FhirString>>) -> Self {
        self.title = title.into();
        self
    }

    pub fn derived_from(mut self, derived_from: impl IntoIterator<Item = Canonical>) -> Self {
        self.derived_from.extend(derived_from);
        self
    }

    pub fn set_derived_from(mut self, derived_from: impl IntoIterator<Item = Canonical>) -> Self {
        self.derived_from = derived_from.into_iter().collect();
        self
    }

    pub fn experimental(mut self, experimental: impl Into<Option<Boolean>>) -> Self {
        self.experimental = experimental.into();
        self
    }

    pub fn subject_type(mut self, subject_type: impl IntoIterator<Item = Code>) -> Self {
        self.subject_type.extend(subject_type);
        self
    }

    pub fn set_subject_type(mut self, subject_type: impl IntoIterator<Item = Code>) -> Self {
        self.subject_type = subject_type.into_iter().collect();
        self
    }

    pub fn date(mut self, date: impl Into<Option<DateTime>>) -> Self {
        self.date = date.into();
        self
    }

    pub fn publisher(mut self, publisher: impl Into<Option<FhirString>>) -> Self {
        self.publisher = publisher.into();
        self
    }

    pub fn description(mut self, description: impl Into<Option<Markdown>>) -> Self {
        self.description = description.into();
        self
    }

    pub fn purpose(mut self, purpose: impl Into<Option<Markdown>>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn copyright(mut self, copyright: impl Into<Option<Markdown>>) -> Self {
        self.copyright = copyright.into();
        self
    }

    pub fn approval_date(mut self, approval_date: impl Into<Option<Date>>) -> Self {
        self.approval_date = approval_date.into();
        self
    }

    pub fn last_review_date(mut self, last_review_date: impl Into<Option<Date>>) -> Self {
        self.last_review_date = last_review_date.into();
        self
    }

    pub fn effective_period(mut self, effective_period: impl Into<Option<Period>>) -> Self {
        self.effective_period = effective_period.into();
        self
    }

    pub fn code(mut self, code: impl IntoIterator<Item = Coding>) -> Self {
        self.code.extend(code);
        self
    }

    pub fn set_code(mut self, code: impl IntoIterator<Item = Coding>) -> Self {
        self.code = code.into_iter().collect();
        self
    }

    pub fn item(mut self, item: impl IntoIterator<Item = Item>) -> Self {
        self.item.extend(item);
        self
    }

    pub fn set_item(mut self, item: impl IntoIterator<Item = Item>) -> Self {
        self.item = item.into_iter().collect();
        self
    }

    pub fn build(&self) -> Result<Questionnaire> {
        finish("Questionnaire", || {
            let status = require_non_null(self.status.clone(), "status")?;
            let mut questionnaire = Questionnaire {
                hash: 0,
                resource: self.resource.clone(),
                domain: self.domain.clone(),
                url: self.url.clone(),
                identifier: self.identifier.clone(),
                version: self.version.clone(),
                name: self.name.clone(),
                title: self.title.clone(),
                derived_from: self.derived_from.clone(),
                status,
                experimental: self.experimental.clone(),
                subject_type: self.subject_type.clone(),
                date: self.date.clone(),
                publisher: self.publisher.clone(),
                description: self.description.clone(),
                purpose: self.purpose.clone(),
                copyright: self.copyright.clone(),
                approval_date: self.approval_date.clone(),
                last_review_date: self.last_review_date.clone(),
                effective_period: self.effective_period.clone(),
                code: self.code.clone(),
                item: self.item.clone(),
            };
            questionnaire.hash = structural_hash(&questionnaire);
            Ok(questionnaire)
        })
    }
}

impl From<&Questionnaire> for QuestionnaireBuilder {
    fn from(questionnaire: &Questionnaire) -> Self {
        Self {
            resource: questionnaire.resource.clone(),
            domain: questionnaire.domain.clone(),
            url: questionnaire.url.clone(),
            identifier: questionnaire.identifier.clone(),
            version: questionnaire.version.clone(),
            name: questionnaire.name.clone(),
            title: questionnaire.title.clone(),
            derived_from: questionnaire.derived_from.clone(),
            status: Some(questionnaire.status.clone()),
            experimental: questionnaire.experimental.clone(),
            subject_type: questionnaire.subject_type.clone(),
            date: questionnaire.date.clone(),
            publisher: questionnaire.publisher.clone(),
            description: questionnaire.description.clone(),
            purpose: questionnaire.purpose.clone(),
            copyright: questionnaire.copyright.clone(),
            approval_date: questionnaire.approval_date.clone(),
            last_review_date: questionnaire.last_review_date.clone(),
            effective_period: questionnaire.effective_period.clone(),
            code: questionnaire.code.clone(),
            item: questionnaire.item.clone(),
        }
    }
}

// ============================================================================
// Item
// ============================================================================

/// A question, a group of questions or display text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    base: BackboneFields,
    link_id: FhirString,
    definition: Option<Uri>,
    code: Vec<Coding>,
    prefix: Option<FhirString>,
    text: Option<FhirString>,
    type_: Code,
    enable_when: Vec<EnableWhen>,
    enable_behavior: Option<Code>,
    required: Option<Boolean>,
    repeats: Option<Boolean>,
    read_only: Option<Boolean>,
    max_length: Option<Integer>,
    answer_value_set: Option<Canonical>,
    answer_option: Vec<AnswerOption>,
    item: Vec<Item>,
}

impl Item {
    pub fn builder(
        link_id: impl Into<Option<FhirString>>,
        type_: impl Into<Option<Code>>,
    ) -> ItemBuilder {
        ItemBuilder {
            base: BackboneFields::default(),
            link_id: link_id.into(),
            definition: None,
            code: Vec::new(),
            prefix: None,
            text: None,
            type_: type_.into(),
            enable_when: Vec::new(),
            enable_behavior: None,
            required: None,
            repeats: None,
            read_only: None,
            max_length: None,
            answer_value_set: None,
            answer_option: Vec::new(),
            item: Vec::new(),
        }
    }

    pub fn to_builder(&self) -> ItemBuilder {
        ItemBuilder::from(self)
    }

    /// Unique id of the item within the questionnaire.
    pub fn link_id(&self) -> &FhirString {
        &self.link_id
    }

    pub fn definition(&self) -> Option<&Uri> {
        self.definition.as_ref()
    }

    pub fn code(&self) -> &[Coding] {
        &self.code
    }

    pub fn prefix(&self) -> Option<&FhirString> {
        self.prefix.as_ref()
    }

    pub fn text(&self) -> Option<&FhirString> {
        self.text.as_ref()
    }

    pub fn type_(&self) -> &Code {
        &self.type_
    }

    pub fn enable_when(&self) -> &[EnableWhen] {
        &self.enable_when
    }

    pub fn enable_behavior(&self) -> Option<&Code> {
        self.enable_behavior.as_ref()
    }

    pub fn required(&self) -> Option<&Boolean> {
        self.required.as_ref()
    }

    pub fn repeats(&self) -> Option<&Boolean> {
        self.repeats.as_ref()
    }

    pub fn read_only(&self) -> Option<&Boolean> {
        self.read_only.as_ref()
    }

    pub fn max_length(&self) -> Option<&Integer> {
        self.max_length.as_ref()
    }

    pub fn answer_value_set(&self) -> Option<&Canonical> {
        self.answer_value_set.as_ref()
    }

    pub fn answer_option(&self) -> &[AnswerOption] {
        &self.answer_option
    }

    /// Nested items.
    pub fn item(&self) -> &[Item] {
        &self.item
    }
}

backbone_element!(
    Item,
    ItemBuilder,
    "Questionnaire.Item",
    |i| Fields::new()
        .backbone(&i.base)
        .one("linkId", &i.link_id)
        .opt("definition", i.definition.as_ref())
        .many("code", &i.code)
        .opt("prefix", i.prefix.as_ref())
        .opt("text", i.text.as_ref())
        .one("type", &i.type_)
        .many("enableWhen", &i.enable_when)
        .opt("enableBehavior", i.enable_behavior.as_ref())
        .opt("required", i.required.as_ref())
        .opt("repeats", i.repeats.as_ref())
        .opt("readOnly", i.read_only.as_ref())
        .opt("maxLength", i.max_length.as_ref())
        .opt("answerValueSet", i.answer_value_set.as_ref())
        .many("answerOption", &i.answer_option)
        .many("item", &i.item)
        .build()
);

#[derive(Debug, Clone)]
pub struct ItemBuilder {
    base: BackboneFields,
    link_id: Option<FhirString>,
    definition: Option<Uri>,
    code: Vec<Coding>,
    prefix: Option<FhirString>,
    text: Option<FhirString>,
    type_: Option<Code>,
    enable_when: Vec<EnableWhen>,
    enable_behavior: Option<Code>,
    required: Option<Boolean>,
    repeats: Option<Boolean>,
    read_only: Option<Boolean>,
    max_length: Option<Integer>,
    answer_value_set: Option<Canonical>,
    answer_option: Vec<AnswerOption>,
    item: Vec<Item>,
}

impl ItemBuilder {
    pub fn definition(mut self, definition: impl Into<Option<Uri>>) -> Self {
        self.definition = definition.into();
        self
    }

    pub fn code(mut self, code: impl IntoIterator<Item = Coding>) -> Self {
        self.code.extend(code);
        self
    }

    pub fn set_code(mut self, code: impl IntoIterator<Item = Coding>) -> Self {
        self.code = code.into_iter().collect();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<Option<FhirString>>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn text(mut self, text: impl Into<Option<FhirString>>) -> Self {
        self.text = text.into();
        self
    }

    pub fn enable_when(mut self, enable_when: impl IntoIterator<Item = EnableWhen>) -> Self {
        self.enable_when.extend(enable_when);
        self
    }

    pub fn set_enable_when(mut self, enable_when: impl IntoIterator<Item = EnableWhen>) -> Self {
        self.enable_when = enable_when.into_iter().collect();
        self
    }

    pub fn enable_behavior(mut self, enable_behavior: impl Into<Option<Code>>) -> Self {
        self.enable_behavior = enable_behavior.into();
        self
    }

    pub fn required(mut self, required: impl Into<Option<Boolean>>) -> Self {
        self.required = required.into();
        self
    }

    pub fn repeats(mut self, repeats: impl Into<Option<Boolean>>) -> Self {
        self.repeats = repeats.into();
        self
    }

    pub fn read_only(mut self, read_only: impl Into<Option<Boolean>>) -> Self {
        self.read_only = read_only.into();
        self
    }

    pub fn max_length(mut self, max_length: impl Into<Option<Integer>>) -> Self {
        self.max_length = max_length.into();
        self
    }

    pub fn answer_value_set(mut self, answer_value_set: impl Into<Option<Canonical>>) -> Self {
        self.answer_value_set = answer_value_set.into();
        self
    }

    pub fn answer_option(mut self, answer_option: impl IntoIterator<Item = AnswerOption>) -> Self {
        self.answer_option.extend(answer_option);
        self
    }

    pub fn set_answer_option(
        mut self,
        answer_option: impl IntoIterator<Item = AnswerOption>,
    ) -> Self {
        self.answer_option = answer_option.into_iter().collect();
        self
    }

    pub fn item(mut self, item: impl IntoIterator<Item = Item>) -> Self {
        self.item.extend(item);
        self
    }

    pub fn set_item(mut self, item: impl IntoIterator<Item = Item>) -> Self {
        self.item = item.into_iter().collect();
        self
    }

    pub fn build(&self) -> Result<Item> {
        finish("Questionnaire.Item", || {
            self.base.validate()?;
            let link_id = require_non_null(self.link_id.clone(), "linkId")?;
            let type_ = require_non_null(self.type_.clone(), "type")?;
            let item = Item {
                base: self.base.clone(),
                link_id,
                definition: self.definition.clone(),
                code: self.code.clone(),
                prefix: self.prefix.clone(),
                text: self.text.clone(),
                type_,
                enable_when: self.enable_when.clone(),
                enable_behavior: self.enable_behavior.clone(),
                required: self.required.clone(),
                repeats: self.repeats.clone(),
                read_only: self.read_only.clone(),
                max_length: self.max_length.clone(),
                answer_value_set: self.answer_value_set.clone(),
                answer_option: self.answer_option.clone(),
                item: self.item.clone(),
            };
            require_value_or_children(&item)?;
            Ok(item)
        })
    }
}

impl From<&Item> for ItemBuilder {
    fn from(item: &Item) -> Self {
        Self {
            base: item.base.clone(),
            link_id: Some(item.link_id.clone()),
            definition: item.definition.clone(),
            code: item.code.clone(),
            prefix: item.prefix.clone(),
            text: item.text.clone(),
            type_: Some(item.type_.clone()),
            enable_when: item.enable_when.clone(),
            enable_behavior: item.enable_behavior.clone(),
            required: item.required.clone(),
            repeats: item.repeats.clone(),
            read_only: item.read_only.clone(),
            max_length: item.max_length.clone(),
            answer_value_set: item.answer_value_set.clone(),
            answer_option: item.answer_option.clone(),
            item: item.item.clone(),
        }
    }
}

// ============================================================================
// EnableWhen
// ============================================================================

/// Condition under which an item is shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnableWhen {
    base: BackboneFields,
    question: FhirString,
    operator: Code,
    answer: EnableWhenAnswer,
}

impl EnableWhen {
    pub fn builder(
        question: impl Into<Option<FhirString>>,
        operator: impl Into<Option<Code>>,
        answer: impl Into<Option<Element>>,
    ) -> EnableWhenBuilder {
        EnableWhenBuilder {
            base: BackboneFields::default(),
            question: question.into(),
            operator: operator.into(),
            answer: answer.into(),
        }
    }

    pub fn to_builder(&self) -> EnableWhenBuilder {
        EnableWhenBuilder::from(self)
    }

    pub fn question(&self) -> &FhirString {
        &self.question
    }

    pub fn operator(&self) -> &Code {
        &self.operator
    }

    /// `answer[x]`: one of the types of [`EnableWhenAnswer`].
    pub fn answer(&self) -> &EnableWhenAnswer {
        &self.answer
    }
}

backbone_element!(
    EnableWhen,
    EnableWhenBuilder,
    "Questionnaire.Item.EnableWhen",
    |e| Fields::new()
        .backbone(&e.base)
        .one("question", &e.question)
        .one("operator", &e.operator)
        .choice("answer", Some(&e.answer))
        .build()
);

#[derive(Debug, Clone)]
pub struct EnableWhenBuilder {
    base: BackboneFields,
    question: Option<FhirString>,
    operator: Option<Code>,
    answer: Option<Element>,
}

impl EnableWhenBuilder {
    pub fn build(&self) -> Result<EnableWhen> {
        finish("Questionnaire.Item.EnableWhen", || {
            self.base.validate()?;
            let question = require_non_null(self.question.clone(), "question")?;
            let operator = require_non_null(self.operator.clone(), "operator")?;
            let answer: EnableWhenAnswer =
                require_choice_element(self.answer.clone(), "answer")?;
            let enable_when = EnableWhen {
                base: self.base.clone(),
                question,
                operator,
                answer,
            };
            require_value_or_children(&enable_when)?;
            Ok(enable_when)
        })
    }
}

impl From<&EnableWhen> for EnableWhenBuilder {
    fn from(enable_when: &EnableWhen) -> Self {
        Self {
            base: enable_when.base.clone(),
            question: Some(enable_when.question.clone()),
            operator: Some(enable_when.operator.clone()),
            answer: Some(enable_when.answer.clone().into()),
        }
    }
}

// ============================================================================
// AnswerOption
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnswerOption {
    base: BackboneFields,
    value: AnswerOptionValue,
    initial_selected: Option<Boolean>,
}

impl AnswerOption {
    pub fn builder(value: impl Into<Option<Element>>) -> AnswerOptionBuilder {
        AnswerOptionBuilder {
            base: BackboneFields::default(),
            value: value.into(),
            initial_selected: None,
        }
    }

    pub fn to_builder(&self) -> AnswerOptionBuilder {
        AnswerOptionBuilder::from(self)
    }

    /// `value[x]`: one of the types of [`AnswerOptionValue`].
    pub fn value(&self) -> &AnswerOptionValue {
        &self.value
    }

    pub fn initial_selected(&self) -> Option<&Boolean> {
        self.initial_selected.as_ref()
    }
}

backbone_element!(
    AnswerOption,
    AnswerOptionBuilder,
    "Questionnaire.Item.AnswerOption",
    |a| Fields::new()
        .backbone(&a.base)
        .choice("value", Some(&a.value))
        .opt("initialSelected", a.initial_selected.as_ref())
        .build()
);

#[derive(Debug, Clone)]
pub struct AnswerOptionBuilder {
    base: BackboneFields,
    value: Option<Element>,
    initial_selected: Option<Boolean>,
}

impl AnswerOptionBuilder {
    pub fn initial_selected(mut self, initial_selected: impl Into<Option<Boolean>>) -> Self {
        self.initial_selected = initial_selected.into();
        self
    }

    pub fn build(&self) -> Result<AnswerOption> {
        finish("Questionnaire.Item.AnswerOption", || {
            self.base.validate()?;
            let value: AnswerOptionValue =
                require_choice_element(self.value.clone(), "value")?;
            let answer_option = AnswerOption {
                base: self.base.clone(),
                value,
                initial_selected: self.initial_selected.clone(),
            };
            require_value_or_children(&answer_option)?;
            Ok(answer_option)
        })
    }
}

impl From<&AnswerOption> for AnswerOptionBuilder {
    fn from(answer_option: &AnswerOption) -> Self {
        Self {
            base: answer_option.base.clone(),
            value: Some(answer_option.value.clone().into()),
            initial_selected: answer_option.initial_selected.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use crate::types::Quantity;
    use crate::visitor::collect;
    use crate::Error;

    fn question(link_id: &str, type_: &str) -> ItemBuilder {
        Item::builder(FhirString::new(link_id).unwrap(), Code::new(type_).unwrap())
    }

    #[test]
    fn test_nested_items() {
        let smoker = question("1.1", "boolean").build().unwrap();
        let packs = question("1.2", "integer")
            .enable_when([EnableWhen::builder(
                FhirString::new("1.1").unwrap(),
                Code::new("=").unwrap(),
                Boolean::from(true),
            )
            .build()
            .unwrap()])
            .build()
            .unwrap();
        let group = question("1", "group").item([smoker, packs]).build().unwrap();
        let questionnaire = Questionnaire::builder(Code::new("active").unwrap())
            .item([group])
            .build()
            .unwrap();

        let items = collect::<Item>(&questionnaire);
        let link_ids: Vec<_> = items
            .iter()
            .filter_map(|item| item.link_id().as_str())
            .collect();
        assert_eq!(link_ids, vec!["1", "1.1", "1.2"]);
        assert_eq!(items[2].enable_when()[0].answer().type_name(), "boolean");
    }

    #[test]
    fn test_item_requires_link_id_and_type() {
        assert_eq!(
            Item::builder(None, Code::new("display").unwrap()).build().unwrap_err(),
            Error::MissingRequiredField { field: "linkId" }
        );
        assert_eq!(
            Item::builder(FhirString::new("a").unwrap(), None).build().unwrap_err(),
            Error::MissingRequiredField { field: "type" }
        );
    }

    #[test]
    fn test_enable_when_answer_types() {
        let quantity = Quantity::builder()
            .code(Code::new("kg").unwrap())
            .build()
            .unwrap();
        assert!(EnableWhen::builder(
            FhirString::new("w").unwrap(),
            Code::new(">").unwrap(),
            quantity,
        )
        .build()
        .is_ok());

        let err = EnableWhen::builder(
            FhirString::new("w").unwrap(),
            Code::new("=").unwrap(),
            Markdown::new("*yes*").unwrap(),
        )
        .build()
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidChoiceType { field: "answer", found: "markdown", .. }
        ));
    }

    #[test]
    fn test_answer_option_value() {
        let yes = Coding::builder().code(Code::new("y").unwrap()).build().unwrap();
        let option = AnswerOption::builder(yes)
            .initial_selected(Boolean::from(true))
            .build()
            .unwrap();
        assert_eq!(option.value().type_name(), "Coding");

        let err = AnswerOption::builder(Boolean::from(true)).build().unwrap_err();
        assert_eq!(err.field(), Some("value"));
    }

    #[test]
    fn test_status_is_required() {
        assert_eq!(
            Questionnaire::builder(None).build().unwrap_err(),
            Error::MissingRequiredField { field: "status" }
        );
    }
}
