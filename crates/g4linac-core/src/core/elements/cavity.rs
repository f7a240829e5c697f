use crate::core::section::{
    ConfigError, FieldKind, FieldSpec, FieldValue, Section, render_value,
};

/// A pillbox RF cavity and its placement along the beamline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cavity {
    pub name: String,
    pub inner_length: f64, // mm
    pub frequency: f64,    // GHz
    pub max_gradient: f64, // MV/m
    pub z_position: f64,   // mm
    pub phase: Option<toml::Value>,
    pub time_offset: Option<toml::Value>,
}

impl Section for Cavity {
    const SECTION: &'static str = "cavity";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", FieldKind::Text),
        FieldSpec::new("inner_length", FieldKind::Float),
        FieldSpec::new("frequency", FieldKind::Float),
        FieldSpec::new("max_gradient", FieldKind::Float),
        FieldSpec::new("z_position", FieldKind::Float),
        FieldSpec::new("phase", FieldKind::Untyped),
        FieldSpec::new("time_offset", FieldKind::Untyped),
    ];

    fn assign(&mut self, field: &'static str, value: FieldValue) -> Result<(), ConfigError> {
        match (field, value) {
            ("name", FieldValue::Text(v)) => self.name = v,
            ("inner_length", FieldValue::Float(v)) => self.inner_length = v,
            ("frequency", FieldValue::Float(v)) => self.frequency = v,
            ("max_gradient", FieldValue::Float(v)) => self.max_gradient = v,
            ("z_position", FieldValue::Float(v)) => self.z_position = v,
            ("phase", FieldValue::Untyped(v)) => self.phase = Some(v),
            ("time_offset", FieldValue::Untyped(v)) => self.time_offset = Some(v),
            (field, value) => return Err(Self::undeclared(field, &value)),
        }
        Ok(())
    }
}

impl Cavity {
    pub fn from_config(config: &toml::Table) -> Result<Self, ConfigError> {
        let mut cavity = Self::default();
        cavity.apply(config)?;
        Ok(cavity)
    }

    /// Emits the `pillbox` declaration followed by its `place` command.
    pub fn build(&self) -> String {
        let mut out = format!(
            "\npillbox {} innerLength={:?} frequency={:?} \\\n    maxGradient={:?} irisRadius=100.0 \\\n    win1Thick=0.0 win2Thick=0.0 wallThick=0.0 collarThick=0.0 \\\n    kill=1 maxStep=0.1 innerRadius=500.0",
            self.name, self.inner_length, self.frequency, self.max_gradient
        );
        if let Some(phase) = &self.phase {
            out.push_str(&format!(" phaseAcc={}", render_value(phase)));
        }
        if self.time_offset.is_some() {
            // NOTE: timeOffset is written from `phase`, not `time_offset`.
            let phase = self.phase.as_ref().map_or_else(|| "None".to_string(), render_value);
            out.push_str(&format!(" timeOffset={phase}"));
        }
        out.push_str(&format!(
            "\nplace {} z={:?} color=1,0,0\n",
            self.name, self.z_position
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pillbox_1() -> toml::Table {
        toml::from_str(
            r#"
            name = "pillbox_1"
            inner_length = 500
            frequency = 0.02
            max_gradient = 10
            z_position = 1000
            "#,
        )
        .unwrap()
    }

    #[test]
    fn build_without_phase_or_offset() {
        let cavity = Cavity::from_config(&pillbox_1()).unwrap();
        let text = cavity.build();

        assert!(text.contains("pillbox pillbox_1 innerLength=500.0 frequency=0.02"));
        assert!(text.contains("maxGradient=10.0 irisRadius=100.0"));
        assert!(!text.contains("phaseAcc"));
        assert!(!text.contains("timeOffset"));
        assert!(text.contains("place pillbox_1 z=1000.0 color=1,0,0"));

        let pillbox_at = text.find("pillbox pillbox_1").unwrap();
        let place_at = text.find("place pillbox_1").unwrap();
        assert!(pillbox_at < place_at);
    }

    #[test]
    fn phase_clause_is_appended_to_declaration() {
        let mut config = pillbox_1();
        config.insert("phase".into(), toml::Value::Float(0.0));
        let text = Cavity::from_config(&config).unwrap().build();
        assert!(text.contains("innerRadius=500.0 phaseAcc=0.0\nplace"));
    }

    #[test]
    fn time_offset_clause_carries_phase_value() {
        let mut config = pillbox_1();
        config.insert("phase".into(), toml::Value::Float(15.0));
        config.insert("time_offset".into(), toml::Value::Float(2.5));
        let text = Cavity::from_config(&config).unwrap().build();
        assert!(text.contains("phaseAcc=15.0 timeOffset=15.0"));
        assert!(!text.contains("timeOffset=2.5"));
    }

    #[test]
    fn time_offset_without_phase_writes_none() {
        let mut config = pillbox_1();
        config.insert("time_offset".into(), toml::Value::Float(2.5));
        let text = Cavity::from_config(&config).unwrap().build();
        assert!(text.contains("timeOffset=None"));
    }

    #[test]
    fn unknown_cavity_key_is_rejected() {
        let mut config = pillbox_1();
        config.insert("gradient".into(), toml::Value::Float(1.0));
        let err = Cavity::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnrecognizedField { section: "cavity", ref key } if key == "gradient"
        ));
    }
}
