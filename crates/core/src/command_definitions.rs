use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use serde::Deserialize;

use crate::flag::{Flag, FlagType};

#[derive(Deserialize, Debug, Clone)]
pub struct FlagDefinition {
    pub name: String,
    #[serde(rename = "type", default)]
    pub value_type: FlagType,
    pub usage: Option<String>,
    pub default: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl Display for FlagDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "`--{}`", self.name)?;

        if let Some(usage) = &self.usage {
            write!(formatter, " ({})", usage)?;
        }

        Ok(())
    }
}

impl From<&FlagDefinition> for Flag {
    fn from(definition: &FlagDefinition) -> Self {
        let mut flag = Flag::new(definition.name.clone(), definition.value_type);
        if let Some(usage) = &definition.usage {
            flag = flag.with_usage(usage.clone());
        }
        if let Some(default) = &definition.default {
            flag = flag.with_default(default.clone());
        }
        if definition.required {
            flag = flag.required();
        }
        flag
    }
}

/// One command of the YAML tree definition, with its sub commands.
#[derive(Deserialize, Debug, Clone)]
pub struct CommandDefinition {
    pub name: String,
    pub about: Option<String>,
    pub flags: Option<Vec<FlagDefinition>>,
    pub commands: Option<Vec<CommandDefinition>>,
    pub run: Option<Vec<String>>,
    pub working_directory: Option<String>,
    pub environment: Option<HashMap<String, String>>,
}

impl Display for CommandDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.about {
            Some(about) => write!(formatter, "{} ({})", self.name, about),
            None => formatter.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::FlagKind;

    #[test]
    fn test_flag_from_definition() {
        let definition = FlagDefinition {
            name: "tag".to_string(),
            value_type: FlagType::StringList,
            usage: Some("extra tags".to_string()),
            default: Some("a,b".to_string()),
            required: false,
        };

        let flag = Flag::from(&definition);
        assert_eq!(flag.name(), "tag");
        assert_eq!(flag.kind(), FlagKind::Repeatable);
        assert_eq!(flag.usage, "extra tags");
        assert_eq!(flag.value_text(), "a b");
        assert!(!flag.required);
        assert_eq!(format!("{definition}"), "`--tag` (extra tags)");
    }

    #[test]
    fn test_flag_type_defaults_to_string() {
        let definition: FlagDefinition = serde_yaml::from_str("name: env\nrequired: true").unwrap();
        assert_eq!(definition.value_type, FlagType::String);
        assert!(definition.required);
    }

    #[test]
    fn test_command_display() {
        let definition: CommandDefinition =
            serde_yaml::from_str("name: deploy\nabout: Deploy a service").unwrap();
        assert_eq!(format!("{definition}"), "deploy (Deploy a service)");
    }
}
