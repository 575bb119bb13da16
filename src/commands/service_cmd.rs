//! Shortener and uploader registry commands.

use serde::{de::DeserializeOwned, Serialize};

use super::{CommandError, ShortenerCommand, UploaderCommand};
use crate::registry::{capitalize, toggle_message, JsonRegistry};
use crate::settings::Settings;
use crate::types::{ServiceEntry, ShortenerConfig, UploaderConfig};
use crate::{shortener_registry, uploader_registry};

pub fn handle_shortener(settings: &Settings, action: ShortenerCommand) -> Result<String, CommandError> {
    let registry = shortener_registry(settings);
    match action {
        ShortenerCommand::Add { name, base, api_key } => {
            add(&registry, ShortenerConfig::new(name, base, api_key))
        }
        ShortenerCommand::List => Ok(registry.listing()?),
        ShortenerCommand::Toggle { index } => toggle(&registry, index),
        ShortenerCommand::Remove { index } => remove(&registry, index),
    }
}

pub fn handle_uploader(settings: &Settings, action: UploaderCommand) -> Result<String, CommandError> {
    let registry = uploader_registry(settings);
    match action {
        UploaderCommand::Add {
            name,
            endpoint,
            api_key,
        } => add(&registry, UploaderConfig::new(name, endpoint, api_key)),
        UploaderCommand::List => Ok(registry.listing()?),
        UploaderCommand::Toggle { index } => toggle(&registry, index),
        UploaderCommand::Remove { index } => remove(&registry, index),
    }
}

fn add<T>(registry: &JsonRegistry<T>, entry: T) -> Result<String, CommandError>
where
    T: ServiceEntry + Serialize + DeserializeOwned + Clone,
{
    let name = entry.name().to_string();
    registry.add(entry)?;
    Ok(format!("{} '{}' added successfully.", capitalize(T::KIND), name))
}

fn toggle<T>(registry: &JsonRegistry<T>, index: usize) -> Result<String, CommandError>
where
    T: ServiceEntry + Serialize + DeserializeOwned + Clone,
{
    let entry = registry.toggle(index)?;
    Ok(toggle_message(&entry))
}

fn remove<T>(registry: &JsonRegistry<T>, index: usize) -> Result<String, CommandError>
where
    T: ServiceEntry + Serialize + DeserializeOwned + Clone,
{
    let removed = registry.remove(index)?;
    Ok(format!("{} '{}' removed successfully.", capitalize(T::KIND), removed.name()))
}
