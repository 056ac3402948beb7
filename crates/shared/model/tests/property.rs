use cirrus_model::{EngineOption, EngineOptionSetting, StableHash, TimeoutSignal};
use proptest::prelude::*;

fn text() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-zA-Z0-9_ .-]{0,16}")
}

fn flag() -> impl Strategy<Value = Option<bool>> {
    proptest::option::of(any::<bool>())
}

fn names() -> impl Strategy<Value = Option<Vec<String>>> {
    proptest::option::of(proptest::collection::vec("[A-Z_]{1,12}", 0..4))
}

#[derive(Debug, Clone)]
struct SettingFields {
    setting_name: Option<String>,
    setting_description: Option<String>,
    default_value: Option<String>,
    apply_type: Option<String>,
    allowed_values: Option<String>,
    is_modifiable: Option<bool>,
}

impl SettingFields {
    fn build(&self) -> EngineOptionSetting {
        let mut setting = EngineOptionSetting::default();
        setting.set_setting_name(self.setting_name.clone());
        setting.set_setting_description(self.setting_description.clone());
        setting.set_default_value(self.default_value.clone());
        setting.set_apply_type(self.apply_type.clone());
        setting.set_allowed_values(self.allowed_values.clone());
        setting.set_is_modifiable(self.is_modifiable);
        setting
    }
}

#[derive(Debug, Clone)]
struct OptionFields {
    name: Option<String>,
    description: Option<String>,
    engine_name: Option<String>,
    major_engine_version: Option<String>,
    minimum_required_minor_engine_version: Option<String>,
    port_required: Option<bool>,
    default_port: Option<i32>,
    depends_on: Option<Vec<String>>,
    persistent: Option<bool>,
    permanent: Option<bool>,
    settings: Option<Vec<SettingFields>>,
}

impl OptionFields {
    fn build(&self) -> EngineOption {
        let mut option = EngineOption::new();
        option.set_name(self.name.clone());
        option.set_description(self.description.clone());
        option.set_engine_name(self.engine_name.clone());
        option.set_major_engine_version(self.major_engine_version.clone());
        option.set_minimum_required_minor_engine_version(
            self.minimum_required_minor_engine_version.clone(),
        );
        option.set_port_required(self.port_required);
        option.set_default_port(self.default_port);
        option.set_depends_on(self.depends_on.clone());
        option.set_persistent(self.persistent);
        option.set_permanent(self.permanent);
        option.set_settings(
            self.settings.as_ref().map(|settings| settings.iter().map(SettingFields::build).collect()),
        );
        option
    }
}

prop_compose! {
    fn setting_fields()(
        setting_name in text(),
        setting_description in text(),
        default_value in text(),
        apply_type in text(),
        allowed_values in text(),
        is_modifiable in flag(),
    ) -> SettingFields {
        SettingFields {
            setting_name,
            setting_description,
            default_value,
            apply_type,
            allowed_values,
            is_modifiable,
        }
    }
}

prop_compose! {
    fn option_fields()(
        name in text(),
        description in text(),
        engine_name in text(),
        major_engine_version in text(),
        minimum_required_minor_engine_version in text(),
        port_required in flag(),
        default_port in proptest::option::of(any::<i32>()),
        depends_on in names(),
        persistent in flag(),
        permanent in flag(),
        settings in proptest::option::of(proptest::collection::vec(setting_fields(), 0..3)),
    ) -> OptionFields {
        OptionFields {
            name,
            description,
            engine_name,
            major_engine_version,
            minimum_required_minor_engine_version,
            port_required,
            default_port,
            depends_on,
            persistent,
            permanent,
            settings,
        }
    }
}

fn engine_option() -> impl Strategy<Value = EngineOption> {
    option_fields().prop_map(|fields| fields.build())
}

fn assert_setting_matches(
    setting: &EngineOptionSetting,
    fields: &SettingFields,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(setting.setting_name(), fields.setting_name.as_deref());
    prop_assert_eq!(setting.setting_description(), fields.setting_description.as_deref());
    prop_assert_eq!(setting.default_value(), fields.default_value.as_deref());
    prop_assert_eq!(setting.apply_type(), fields.apply_type.as_deref());
    prop_assert_eq!(setting.allowed_values(), fields.allowed_values.as_deref());
    prop_assert_eq!(setting.is_modifiable(), fields.is_modifiable);
    Ok(())
}

fn assert_option_matches(option: &EngineOption, fields: &OptionFields) -> Result<(), TestCaseError> {
    prop_assert_eq!(option.name(), fields.name.as_deref());
    prop_assert_eq!(option.description(), fields.description.as_deref());
    prop_assert_eq!(option.engine_name(), fields.engine_name.as_deref());
    prop_assert_eq!(option.major_engine_version(), fields.major_engine_version.as_deref());
    prop_assert_eq!(
        option.minimum_required_minor_engine_version(),
        fields.minimum_required_minor_engine_version.as_deref()
    );
    prop_assert_eq!(option.port_required(), fields.port_required);
    prop_assert_eq!(option.default_port(), fields.default_port);
    prop_assert_eq!(option.persistent(), fields.persistent);
    prop_assert_eq!(option.permanent(), fields.permanent);

    prop_assert_eq!(option.has_depends_on(), fields.depends_on.is_some());
    let expected_names = fields.depends_on.clone().unwrap_or_default();
    let depends_on = option.depends_on();
    prop_assert_eq!(&depends_on[..], expected_names.as_slice());

    prop_assert_eq!(option.has_settings(), fields.settings.is_some());
    let expected = fields.settings.clone().unwrap_or_default();
    let settings = option.settings();
    prop_assert_eq!(settings.len(), expected.len());
    for (setting, fields) in settings.iter().zip(&expected) {
        assert_setting_matches(setting, fields)?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn setting_setters_round_trip(fields in setting_fields()) {
        assert_setting_matches(&fields.build(), &fields)?;
    }

    #[test]
    fn option_setters_round_trip(fields in option_fields()) {
        assert_option_matches(&fields.build(), &fields)?;
    }

    #[test]
    fn clearing_every_field_returns_to_unset(fields in option_fields()) {
        let mut option = fields.build();
        let cleared = OptionFields {
            name: None,
            description: None,
            engine_name: None,
            major_engine_version: None,
            minimum_required_minor_engine_version: None,
            port_required: None,
            default_port: None,
            depends_on: None,
            persistent: None,
            permanent: None,
            settings: None,
        };
        option.set_name(None);
        option.set_description(None);
        option.set_engine_name(None);
        option.set_major_engine_version(None);
        option.set_minimum_required_minor_engine_version(None);
        option.set_port_required(None);
        option.set_default_port(None);
        option.set_depends_on(None);
        option.set_persistent(None);
        option.set_permanent(None);
        option.set_settings(None);

        assert_option_matches(&option, &cleared)?;
        prop_assert_eq!(&option, &EngineOption::new());
    }

    #[test]
    fn equality_is_reflexive_and_symmetric(a in engine_option(), b in engine_option()) {
        prop_assert_eq!(&a, &a.clone());
        prop_assert_eq!(a == b, b == a);
    }

    #[test]
    fn equal_models_hash_equally(fields in option_fields()) {
        let a = fields.build();
        let b = fields.build();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.stable_hash(), b.stable_hash());
    }

    #[test]
    fn one_differing_field_breaks_equality(a in engine_option(), name in "[a-z]{1,8}") {
        let b = a.clone().with_name(format!("{name}-changed"));
        prop_assume!(a.name() != b.name());
        prop_assert_ne!(&a, &b);
    }

    #[test]
    fn one_differing_setting_breaks_equality(fields in option_fields(), modifiable in any::<bool>()) {
        let a = fields.build();
        let mut b = fields.build();
        prop_assume!(b.has_settings() && !b.settings().is_empty());
        let before = b.settings()[0].is_modifiable();
        prop_assume!(before != Some(modifiable));
        b.settings_mut()[0].set_is_modifiable(Some(modifiable));
        prop_assert_ne!(&a, &b);
    }

    #[test]
    fn timeout_overlays_round_trip(message in ".{0,32}", kind in text(), code in text()) {
        let mut signal = TimeoutSignal::new(message.clone());
        signal.set_kind(kind.clone());
        signal.set_code(code.clone());

        prop_assert_eq!(signal.message(), message.as_str());
        prop_assert_eq!(signal.kind(), kind.as_deref());
        prop_assert_eq!(signal.code(), code.as_deref());
    }

    #[test]
    fn json_round_trip_preserves_every_field(fields in option_fields()) {
        let option = fields.build();
        let json = serde_json::to_string(&option).unwrap();
        let back: EngineOption = serde_json::from_str(&json).unwrap();
        assert_option_matches(&back, &fields)?;
        prop_assert_eq!(&back, &option);
        prop_assert_eq!(back.stable_hash(), option.stable_hash());
    }
}
