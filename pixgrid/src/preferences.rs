const DOCUMENTATION: &str = r#"# pixgrid preferences. You may edit this file, but formatting and comments will not be preserved.
#
# grid_size: starting size of new documents when a script doesn't name one. One of 8, 16, 32, 64.
# export_scale: how many output pixels wide each grid cell is in exported PNGs. 1 to 64.
# history_capacity: undo depth, counting the present state.

"#;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Preferences {
    pub grid_size: usize,
    pub export_scale: u32,
    pub history_capacity: usize,
}
impl Default for Preferences {
    fn default() -> Self {
        Self {
            grid_size: pixgrid_core::grid::GridSize::default().cells(),
            export_scale: 16,
            history_capacity: pixgrid_core::history::MAX_HISTORY,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PreferencesError {
    #[error("grid size {0} is not one of 8, 16, 32, 64")]
    GridSize(usize),
    #[error("export scale {0} is not between 1 and {max}", max = Preferences::MAX_EXPORT_SCALE)]
    ExportScale(u32),
    #[error("history capacity must be at least 1")]
    HistoryCapacity,
}

impl Preferences {
    const FILENAME: &'static str = "preferences.toml";
    pub const MAX_EXPORT_SCALE: u32 = 64;
    /// Load from the user's preference directory, or defaults if unavailable or invalid.
    #[must_use]
    pub fn load() -> Self {
        match preferences_dir() {
            Some(mut path) => {
                path.push(Self::FILENAME);
                Self::load_or_default(&path)
            }
            None => {
                log::warn!("No preferences directory, using defaults.");
                Self::default()
            }
        }
    }
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        let loaded: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            let preferences = Self::from_toml(&string)?;
            Ok(preferences)
        };
        match loaded {
            Ok(preferences) => {
                log::debug!("Loaded preferences from {}", path.display());
                preferences
            }
            Err(e) => {
                log::warn!(
                    "Preferences at {} unavailable ({e:#}), using defaults.",
                    path.display()
                );
                Self::default()
            }
        }
    }
    pub fn from_toml(string: &str) -> anyhow::Result<Self> {
        let preferences: Self = toml::from_str(string)?;
        preferences.validate()?;
        Ok(preferences)
    }
    fn validate(&self) -> Result<(), PreferencesError> {
        if pixgrid_core::grid::GridSize::try_from(self.grid_size).is_err() {
            return Err(PreferencesError::GridSize(self.grid_size));
        }
        if !(1..=Self::MAX_EXPORT_SCALE).contains(&self.export_scale) {
            return Err(PreferencesError::ExportScale(self.export_scale));
        }
        if self.history_capacity == 0 {
            return Err(PreferencesError::HistoryCapacity);
        }
        Ok(())
    }
    /// Write to the user's preference directory, prefixed with some documentation.
    pub fn save(&self) -> anyhow::Result<()> {
        let mut path =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Not recursive. If the parent is missing, the user probably has a reason.
        // Errors (like already existing) are ignored, real problems show up on write.
        let _ = std::fs::DirBuilder::new().create(&path);
        path.push(Self::FILENAME);
        let string = DOCUMENTATION.to_owned() + &toml::ser::to_string_pretty(self)?;
        std::fs::write(path, string)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Preferences;
    #[test]
    fn partial_file_fills_defaults() {
        let preferences = Preferences::from_toml("export_scale = 4").unwrap();
        assert_eq!(preferences.export_scale, 4);
        assert_eq!(preferences.grid_size, Preferences::default().grid_size);
    }
    #[test]
    fn invalid_values_rejected() {
        assert!(Preferences::from_toml("grid_size = 12").is_err());
        assert!(Preferences::from_toml("export_scale = 0").is_err());
        assert!(Preferences::from_toml("export_scale = 65").is_err());
        assert!(Preferences::from_toml("export_scale = 4000000000").is_err());
        assert!(Preferences::from_toml("export_scale = 64").is_ok());
        assert!(Preferences::from_toml("history_capacity = 0").is_err());
        assert!(Preferences::from_toml("grid_size = \"big\"").is_err());
    }
    #[test]
    fn missing_file_defaults() {
        let path = std::path::Path::new("/definitely/not/a/real/pixgrid/preferences.toml");
        assert_eq!(Preferences::load_or_default(path), Preferences::default());
    }
    #[test]
    fn serialized_form_parses() {
        let preferences = Preferences {
            grid_size: 64,
            export_scale: 2,
            history_capacity: 5,
        };
        let string = toml::ser::to_string_pretty(&preferences).unwrap();
        assert_eq!(Preferences::from_toml(&string).unwrap(), preferences);
    }
}
