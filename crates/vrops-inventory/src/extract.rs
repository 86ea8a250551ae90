//! Hostname/IP extraction rules
//!
//! Each record type maps to an ordered list of rules. A rule copies the value
//! of one well-known property into a record field, unless the value is the
//! rule's placeholder. Properties are scanned in order, so when a property
//! name repeats the last non-placeholder value wins.

use vrops_client::Property;

/// Record field a rule writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetField {
    Hostname,
    Ip,
}

/// Copy `property` into `field`, unless its value equals `placeholder`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRule {
    pub property: &'static str,
    pub field: TargetField,
    pub placeholder: Option<&'static str>,
}

impl ExtractionRule {
    const fn new(property: &'static str, field: TargetField) -> Self {
        Self {
            property,
            field,
            placeholder: None,
        }
    }

    const fn unless(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

const HOST_SYSTEM: &[ExtractionRule] = &[
    ExtractionRule::new("config|name", TargetField::Hostname),
    ExtractionRule::new("net:vmk0|ip_address", TargetField::Ip),
];

const VIRTUAL_MACHINE: &[ExtractionRule] = &[
    ExtractionRule::new("summary|guest|hostName", TargetField::Hostname).unless("localhost"),
    ExtractionRule::new("summary|guest|ipAddress", TargetField::Ip).unless("127.0.0.1"),
];

/// Record types with extraction rules
pub const RULES: &[(&str, &[ExtractionRule])] = &[
    ("vrops-vmware-hostsystem", HOST_SYSTEM),
    ("vrops-vmware-virtualmachine", VIRTUAL_MACHINE),
];

/// Rules for `record_type`; empty for types that only carry a payload
#[must_use]
pub fn rules_for(record_type: &str) -> &'static [ExtractionRule] {
    RULES
        .iter()
        .find(|(kind, _)| kind.eq_ignore_ascii_case(record_type))
        .map(|(_, rules)| *rules)
        .unwrap_or(&[])
}

/// Hostname and IP pulled out of a property set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub hostname: String,
    pub ip: String,
}

/// Evaluate `rules` against `properties`
#[must_use]
pub fn extract(rules: &[ExtractionRule], properties: &[Property]) -> Extracted {
    let mut extracted = Extracted::default();

    for property in properties {
        for rule in rules.iter().filter(|r| r.property == property.name) {
            if rule.placeholder == Some(property.value.as_str()) {
                continue;
            }
            let slot = match rule.field {
                TargetField::Hostname => &mut extracted.hostname,
                TargetField::Ip => &mut extracted.ip,
            };
            slot.clone_from(&property.value);
        }
    }

    extracted
}
