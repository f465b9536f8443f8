use crate::commands::{CmdMessage, CmdResult};
use crate::config::MedlogConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(data_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = MedlogConfig::load(data_dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = MedlogConfig::load(data_dir)?;
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = MedlogConfig::load(data_dir)?;
            if let Err(e) = config.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e.to_string()));
                return Ok(res);
            }
            config.save(data_dir)?;
            let display_val = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, display_val)));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::config::Clock;
    use tempfile::TempDir;

    #[test]
    fn set_then_show() {
        let dir = TempDir::new().unwrap();

        let set = run(dir.path(), ConfigAction::Set("clock".into(), "24".into())).unwrap();
        assert_eq!(set.messages[0].content, "clock set to 24h");

        let shown = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(shown.config.unwrap().clock, Clock::H24);
    }

    #[test]
    fn unknown_key_is_reported() {
        let dir = TempDir::new().unwrap();

        let res = run(dir.path(), ConfigAction::ShowKey("nope".into())).unwrap();
        assert_eq!(res.messages[0].level, MessageLevel::Error);

        let res = run(dir.path(), ConfigAction::Set("nope".into(), "x".into())).unwrap();
        assert_eq!(res.messages[0].level, MessageLevel::Error);
        assert!(res.config.is_none());
    }
}
