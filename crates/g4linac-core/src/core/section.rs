//! Typed key/value configuration shared by every lattice element.
//!
//! Each configuration object declares a static table of [`FieldSpec`]s. Applying a
//! [`toml::Table`] looks every key up in that table, coerces the incoming value to the
//! declared [`FieldKind`], and hands the typed [`FieldValue`] to the object.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unrecognized field '{key}' in [{section}] configuration")]
    UnrecognizedField { section: &'static str, key: String },

    #[error("Invalid value for {section}.{key}: expected {expected}, found {found}")]
    InvalidValue {
        section: &'static str,
        key: String,
        expected: FieldKind,
        found: String,
    },

    #[error("Unrecognized beam block type '{0}'")]
    UnknownBeamType(String),

    #[error("Invalid beam block #{index}: {message}")]
    InvalidBeamBlock { index: usize, message: String },

    #[error("No mass is known for species id {0}")]
    UnknownSpecies(i32),

    #[error("Duplicate {section} name '{name}'")]
    DuplicateName { section: &'static str, name: String },

    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Field '{field}' of [{section}] cannot hold a {kind} value")]
    UndeclaredField {
        section: &'static str,
        field: &'static str,
        kind: FieldKind,
    },
}

/// The coercion applied to a field before assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Integer,
    Text,
    Flag,
    /// No coercion; the raw value is stored as given.
    Untyped,
    List,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Float => "float",
            FieldKind::Integer => "integer",
            FieldKind::Text => "string",
            FieldKind::Flag => "boolean",
            FieldKind::Untyped => "any value",
            FieldKind::List => "array",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    Text(String),
    Flag(bool),
    Untyped(toml::Value),
    List(Vec<toml::Value>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Flag(_) => FieldKind::Flag,
            FieldValue::Untyped(_) => FieldKind::Untyped,
            FieldValue::List(_) => FieldKind::List,
        }
    }
}

impl FieldKind {
    /// Converts a raw configuration value into this kind, or returns `None` when no
    /// sensible conversion exists.
    pub fn coerce(self, raw: &toml::Value) -> Option<FieldValue> {
        use toml::Value;

        match (self, raw) {
            (FieldKind::Untyped, value) => Some(FieldValue::Untyped(value.clone())),

            (FieldKind::Float, Value::Float(v)) => Some(FieldValue::Float(*v)),
            (FieldKind::Float, Value::Integer(v)) => Some(FieldValue::Float(*v as f64)),
            (FieldKind::Float, Value::Boolean(v)) => Some(FieldValue::Float(f64::from(u8::from(*v)))),
            (FieldKind::Float, Value::String(s)) => s.trim().parse().ok().map(FieldValue::Float),

            (FieldKind::Integer, Value::Integer(v)) => Some(FieldValue::Integer(*v)),
            (FieldKind::Integer, Value::Float(v)) if v.is_finite() => {
                Some(FieldValue::Integer(v.trunc() as i64))
            }
            (FieldKind::Integer, Value::Boolean(v)) => Some(FieldValue::Integer(i64::from(*v))),
            (FieldKind::Integer, Value::String(s)) => {
                s.trim().parse().ok().map(FieldValue::Integer)
            }

            (FieldKind::Text, Value::String(s)) => Some(FieldValue::Text(s.clone())),
            (FieldKind::Text, Value::Array(_) | Value::Table(_)) => None,
            (FieldKind::Text, value) => Some(FieldValue::Text(render_value(value))),

            (FieldKind::Flag, Value::Boolean(v)) => Some(FieldValue::Flag(*v)),
            (FieldKind::Flag, Value::Integer(v)) => Some(FieldValue::Flag(*v != 0)),
            (FieldKind::Flag, Value::String(s)) => match s.trim() {
                "true" => Some(FieldValue::Flag(true)),
                "false" => Some(FieldValue::Flag(false)),
                _ => None,
            },

            (FieldKind::List, Value::Array(items)) => Some(FieldValue::List(items.clone())),

            _ => None,
        }
    }
}

/// Renders a configuration value the way it appears in a lattice deck.
///
/// Floats always carry a decimal point (`1000.0`), strings are written bare.
pub fn render_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Float(v) => format!("{v:?}"),
        toml::Value::Integer(v) => v.to_string(),
        toml::Value::Boolean(v) => u8::from(*v).to_string(),
        other => other.to_string(),
    }
}

/// A configuration object with a fixed set of named, typed fields.
///
/// Implementors start from their `Default` values and are mutated once through
/// [`Section::apply`] before being serialized.
pub trait Section {
    /// Name used in error messages and deck tables (e.g. `cavity`).
    const SECTION: &'static str;

    /// Every field the section recognises.
    const FIELDS: &'static [FieldSpec];

    /// Stores an already-coerced value. Only called with names and kinds taken from
    /// [`Section::FIELDS`].
    fn assign(&mut self, field: &'static str, value: FieldValue) -> Result<(), ConfigError>;

    fn field(key: &str) -> Option<&'static FieldSpec> {
        Self::FIELDS.iter().find(|spec| spec.name == key)
    }

    fn apply(&mut self, config: &toml::Table) -> Result<(), ConfigError> {
        for (key, raw) in config {
            let spec = Self::field(key).ok_or_else(|| ConfigError::UnrecognizedField {
                section: Self::SECTION,
                key: key.clone(),
            })?;
            let value = spec
                .kind
                .coerce(raw)
                .ok_or_else(|| ConfigError::InvalidValue {
                    section: Self::SECTION,
                    key: key.clone(),
                    expected: spec.kind,
                    found: raw.type_str().to_string(),
                })?;
            self.assign(spec.name, value)?;
        }
        Ok(())
    }

    fn undeclared(field: &'static str, value: &FieldValue) -> ConfigError {
        ConfigError::UndeclaredField {
            section: Self::SECTION,
            field,
            kind: value.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Probe {
        length: f64,
        count: i64,
        label: String,
        enabled: bool,
        anything: Option<toml::Value>,
    }

    impl Section for Probe {
        const SECTION: &'static str = "probe";
        const FIELDS: &'static [FieldSpec] = &[
            FieldSpec::new("length", FieldKind::Float),
            FieldSpec::new("count", FieldKind::Integer),
            FieldSpec::new("label", FieldKind::Text),
            FieldSpec::new("enabled", FieldKind::Flag),
            FieldSpec::new("anything", FieldKind::Untyped),
        ];

        fn assign(&mut self, field: &'static str, value: FieldValue) -> Result<(), ConfigError> {
            match (field, value) {
                ("length", FieldValue::Float(v)) => self.length = v,
                ("count", FieldValue::Integer(v)) => self.count = v,
                ("label", FieldValue::Text(v)) => self.label = v,
                ("enabled", FieldValue::Flag(v)) => self.enabled = v,
                ("anything", FieldValue::Untyped(v)) => self.anything = Some(v),
                (field, value) => return Err(Self::undeclared(field, &value)),
            }
            Ok(())
        }
    }

    fn table(src: &str) -> toml::Table {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn apply_coerces_values_to_declared_kinds() {
        let mut probe = Probe::default();
        probe
            .apply(&table(
                r#"
                length = 500
                count = "7"
                label = 3.5
                enabled = 1
                "#,
            ))
            .unwrap();

        assert_eq!(probe.length, 500.0);
        assert_eq!(probe.count, 7);
        assert_eq!(probe.label, "3.5");
        assert!(probe.enabled);
    }

    #[test]
    fn float_field_accepts_numeric_strings() {
        let mut probe = Probe::default();
        probe.apply(&table(r#"length = " 0.02 ""#)).unwrap();
        assert_eq!(probe.length, 0.02);
    }

    #[test]
    fn integer_field_truncates_floats() {
        let mut probe = Probe::default();
        probe.apply(&table("count = 3.9")).unwrap();
        assert_eq!(probe.count, 3);
    }

    #[test]
    fn untyped_field_keeps_raw_value() {
        let mut probe = Probe::default();
        probe.apply(&table(r#"anything = "phase-ref""#)).unwrap();
        assert_eq!(
            probe.anything,
            Some(toml::Value::String("phase-ref".to_string()))
        );

        probe.apply(&table("anything = 12")).unwrap();
        assert_eq!(probe.anything, Some(toml::Value::Integer(12)));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut probe = Probe::default();
        let err = probe.apply(&table("lenght = 1.0")).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnrecognizedField {
                section: "probe",
                key: "lenght".to_string()
            }
        );
    }

    #[test]
    fn non_numeric_string_for_float_is_rejected() {
        let mut probe = Probe::default();
        let err = probe.apply(&table(r#"length = "long""#)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                expected: FieldKind::Float,
                ..
            }
        ));
    }

    #[test]
    fn flag_rejects_arbitrary_strings() {
        assert_eq!(
            FieldKind::Flag.coerce(&toml::Value::String("yes".into())),
            None
        );
        assert_eq!(
            FieldKind::Flag.coerce(&toml::Value::String("false".into())),
            Some(FieldValue::Flag(false))
        );
    }

    #[test]
    fn render_value_keeps_decimal_point_on_floats() {
        assert_eq!(render_value(&toml::Value::Float(1000.0)), "1000.0");
        assert_eq!(render_value(&toml::Value::Float(0.02)), "0.02");
        assert_eq!(render_value(&toml::Value::Integer(-13)), "-13");
        assert_eq!(render_value(&toml::Value::String("mu+".into())), "mu+");
    }
}
