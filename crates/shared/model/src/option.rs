use crate::sdk_model;

/// One tunable setting of an engine option (`OptionGroupOptionSetting`).
#[sdk_model(shape = "OptionGroupOptionSetting")]
pub struct EngineOptionSetting {
    /// Name of the setting, e.g. `SERVER_AUDIT_EVENTS`.
    setting_name: Option<String>,
    setting_description: Option<String>,
    /// Value used when the option is added without overriding this setting.
    default_value: Option<String>,
    /// `STATIC` or `DYNAMIC`.
    apply_type: Option<String>,
    /// Comma-separated list, or a range such as `1-65535`.
    allowed_values: Option<String>,
    is_modifiable: Option<bool>,
}

/// An option a database engine offers to option groups (`OptionGroupOption`).
///
/// Booleans are tri-state: `None` means the service did not say, which is
/// different from `Some(false)`.
#[sdk_model(shape = "OptionGroupOption")]
pub struct EngineOption {
    name: Option<String>,
    description: Option<String>,
    engine_name: Option<String>,
    major_engine_version: Option<String>,
    minimum_required_minor_engine_version: Option<String>,
    port_required: Option<bool>,
    /// Only meaningful when `port_required` is `Some(true)`.
    default_port: Option<i32>,
    /// Names of options that must be present before this one can be added.
    #[model(name = "OptionsDependedOn")]
    depends_on: Option<Vec<String>>,
    /// Cannot be removed from an option group once added.
    persistent: Option<bool>,
    /// Cannot be removed, and the group cannot be detached from an instance.
    permanent: Option<bool>,
    #[model(name = "OptionGroupOptionSettings")]
    settings: Option<Vec<EngineOptionSetting>>,
}

impl EngineOption {
    /// An empty option with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The port to configure, present only when the option requires one.
    #[must_use]
    pub fn effective_port(&self) -> Option<i32> {
        if self.port_required == Some(true) { self.default_port } else { None }
    }

    /// Whether `option_name` is listed in `OptionsDependedOn`.
    #[must_use]
    pub fn depends_on_option(&self, option_name: &str) -> bool {
        self.depends_on().iter().any(|dependency| dependency == option_name)
    }

    /// A copy of the setting named `setting_name`, if listed.
    #[must_use]
    pub fn setting(&self, setting_name: &str) -> Option<EngineOptionSetting> {
        self.settings().iter().find(|setting| setting.setting_name() == Some(setting_name)).cloned()
    }
}
