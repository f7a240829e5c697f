use crate::core::section::{ConfigError, FieldKind, FieldSpec, FieldValue, Section};

/// The nominal particle around which the bunch is defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub particle: String,
    pub p_start: f64, // MeV/c
    pub z_start: f64, // mm
    pub t_start: f64, // ns
    pub no_e_field: i64,
    pub no_e_loss: i64,
}

impl Default for Reference {
    fn default() -> Self {
        Self {
            particle: "mu+".to_string(),
            p_start: 100.0,
            z_start: 0.0,
            t_start: 0.0,
            no_e_field: 0,
            no_e_loss: 0,
        }
    }
}

impl Section for Reference {
    const SECTION: &'static str = "reference";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("particle", FieldKind::Text),
        FieldSpec::new("p_start", FieldKind::Float),
        FieldSpec::new("z_start", FieldKind::Float),
        FieldSpec::new("t_start", FieldKind::Float),
        FieldSpec::new("no_e_field", FieldKind::Integer),
        FieldSpec::new("no_e_loss", FieldKind::Integer),
    ];

    fn assign(&mut self, field: &'static str, value: FieldValue) -> Result<(), ConfigError> {
        match (field, value) {
            ("particle", FieldValue::Text(v)) => self.particle = v,
            ("p_start", FieldValue::Float(v)) => self.p_start = v,
            ("z_start", FieldValue::Float(v)) => self.z_start = v,
            ("t_start", FieldValue::Float(v)) => self.t_start = v,
            ("no_e_field", FieldValue::Integer(v)) => self.no_e_field = v,
            ("no_e_loss", FieldValue::Integer(v)) => self.no_e_loss = v,
            (field, value) => return Err(Self::undeclared(field, &value)),
        }
        Ok(())
    }
}

impl Reference {
    pub fn from_config(config: &toml::Table) -> Result<Self, ConfigError> {
        let mut reference = Self::default();
        reference.apply(config)?;
        Ok(reference)
    }

    pub fn build(&self) -> String {
        format!(
            "reference particle={} referenceMomentum={:?}  beamZ={:?} beamX=0.0 beamT={:?} noEfield={} noEloss={}",
            self.particle,
            self.p_start,
            self.z_start,
            self.t_start,
            self.no_e_field,
            self.no_e_loss
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reference_line() {
        assert_eq!(
            Reference::default().build(),
            "reference particle=mu+ referenceMomentum=100.0  beamZ=0.0 beamX=0.0 beamT=0.0 noEfield=0 noEloss=0"
        );
    }

    #[test]
    fn configured_momentum_and_toggles_are_emitted() {
        let config: toml::Table = toml::from_str(
            r#"
            particle = "mu-"
            p_start = 205.5
            t_start = "1.5"
            no_e_loss = 1
            "#,
        )
        .unwrap();
        let text = Reference::from_config(&config).unwrap().build();
        assert!(text.starts_with("reference particle=mu- referenceMomentum=205.5 "));
        assert!(text.contains("beamT=1.5"));
        assert!(text.ends_with("noEfield=0 noEloss=1"));
    }

    #[test]
    fn integer_toggle_rejects_text() {
        let config: toml::Table = toml::from_str(r#"no_e_field = "on""#).unwrap();
        assert!(matches!(
            Reference::from_config(&config),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
