use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE (e.g., 'reference.p_start=210.0').")]
    MissingEquals(String),

    #[error("Key '{0}' has no section. Expected '<section>.<key>=<value>'.")]
    MissingSection(String),

    #[error("Unknown deck section '{0}'. Expected 'lattice', 'reference', 'beam', or 'cavities.<index>'.")]
    UnknownSection(String),

    #[error("Invalid cavity index in '{0}'. Expected 'cavities.<index>.<key>' (e.g., 'cavities.0.phase').")]
    InvalidCavityIndex(String),

    #[error("Key cannot be empty in '{0}'.")]
    EmptyKey(String),
}

/// The deck table a `--set` override lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckSection {
    Lattice,
    Reference,
    Beam,
    Cavity(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetValue {
    pub section: DeckSection,
    pub key: String,
    pub value: toml::Value,
}

/// Parses `section.key=value` (or `cavities.<index>.key=value`).
pub fn parse_set_value(pair: &str) -> Result<SetValue, ParseError> {
    let (path, raw) = pair
        .split_once('=')
        .ok_or_else(|| ParseError::MissingEquals(pair.to_string()))?;
    let (section, rest) = path
        .trim()
        .split_once('.')
        .ok_or_else(|| ParseError::MissingSection(pair.to_string()))?;

    let (section, key) = match section {
        "lattice" => (DeckSection::Lattice, rest),
        "reference" => (DeckSection::Reference, rest),
        "beam" => (DeckSection::Beam, rest),
        "cavities" => {
            let (index, key) = rest
                .split_once('.')
                .ok_or_else(|| ParseError::InvalidCavityIndex(pair.to_string()))?;
            let index = index
                .parse()
                .map_err(|_| ParseError::InvalidCavityIndex(pair.to_string()))?;
            (DeckSection::Cavity(index), key)
        }
        other => return Err(ParseError::UnknownSection(other.to_string())),
    };

    if key.is_empty() {
        return Err(ParseError::EmptyKey(pair.to_string()));
    }

    Ok(SetValue {
        section,
        key: key.to_string(),
        value: parse_scalar(raw.trim()),
    })
}

/// Reads a command-line value as the narrowest scalar it spells: integer, float,
/// boolean, then string.
pub fn parse_scalar(raw: &str) -> toml::Value {
    if let Ok(v) = raw.parse::<i64>() {
        toml::Value::Integer(v)
    } else if let Ok(v) = raw.parse::<f64>() {
        toml::Value::Float(v)
    } else if let Ok(v) = raw.parse::<bool>() {
        toml::Value::Boolean(v)
    } else {
        toml::Value::String(raw.to_string())
    }
}
