//! Build destinations and dispatchers from configuration

use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use contracts::{Destination, DestinationConfig, DestinationType, LoggerBlueprint};

use crate::destinations::{
    ConsoleDestination, ConsoleStream, DestinationSettings, FileDestination, LineFormat,
    MemoryDestination,
};
use crate::dispatcher::Dispatcher;
use crate::error::DispatcherError;

/// Create a destination from its configuration
#[instrument(
    name = "dispatcher_create_destination",
    skip(config),
    fields(destination = %config.name, destination_type = ?config.destination_type)
)]
pub fn create_destination(
    config: &DestinationConfig,
) -> Result<Arc<dyn Destination>, DispatcherError> {
    let settings = DestinationSettings::from_config(config)
        .map_err(|e| DispatcherError::destination_creation(&config.name, e.to_string()))?;
    let format = parse_param::<LineFormat>(config, "format")?.unwrap_or_default();

    match config.destination_type {
        DestinationType::Console => {
            let stream = parse_param::<ConsoleStream>(config, "stream")?.unwrap_or_default();
            let dest = ConsoleDestination::with_settings(settings)
                .with_stream(stream)
                .with_format(format);
            Ok(Arc::new(dest))
        }
        DestinationType::File => {
            let path = config.param("path").ok_or_else(|| {
                DispatcherError::invalid_param(&config.name, "path", "required for file destinations")
            })?;
            let dest = FileDestination::with_settings(settings, path)
                .map_err(|e| DispatcherError::destination_creation(&config.name, e.to_string()))?
                .with_format(format);
            Ok(Arc::new(dest))
        }
        DestinationType::Memory => {
            let capacity = parse_param::<usize>(config, "capacity")?;
            let dest = MemoryDestination::with_settings(settings);
            let dest = match capacity {
                Some(capacity) => dest.with_capacity(capacity),
                None => dest,
            };
            Ok(Arc::new(dest))
        }
    }
}

/// Build a dispatcher holding every configured destination
#[instrument(
    name = "dispatcher_create",
    skip(blueprint),
    fields(destination_count = blueprint.destinations.len())
)]
pub fn create_dispatcher(blueprint: &LoggerBlueprint) -> Result<Dispatcher, DispatcherError> {
    let dispatcher = Dispatcher::new();
    install_destinations(&dispatcher, blueprint)?;
    info!(
        destinations = dispatcher.count_destinations(),
        "Dispatcher created"
    );
    Ok(dispatcher)
}

/// Add every configured destination to an existing dispatcher.
///
/// Returns the number of destinations actually added.
pub fn install_destinations(
    dispatcher: &Dispatcher,
    blueprint: &LoggerBlueprint,
) -> Result<usize, DispatcherError> {
    let mut added = 0;
    for config in &blueprint.destinations {
        let destination = create_destination(config)?;
        if dispatcher.add_destination(destination) {
            added += 1;
        } else {
            warn!(destination = %config.name, "Duplicate destination ignored");
        }
    }
    Ok(added)
}

fn parse_param<T>(config: &DestinationConfig, key: &str) -> Result<Option<T>, DispatcherError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    config
        .param(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| DispatcherError::invalid_param(&config.name, key, e.to_string()))
        })
        .transpose()
}
