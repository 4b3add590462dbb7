//! Named callback registry for bar buttons.
//!
//! Each button stores a callback key. A handler entity carries a
//! `UiEventManager` mapping keys to registered one-shot systems; on a
//! successful selection the key is resolved against it and the system runs.
use std::collections::HashMap;

use bevy::{ecs::system::SystemId, prelude::*};

#[derive(Component, Clone, Debug, Default)]
pub struct UiEventManager {
    callbacks: HashMap<String, SystemId>,
}

impl UiEventManager {
    pub fn with_callback(mut self, key: impl Into<String>, callback: SystemId) -> Self {
        self.register(key, callback);
        self
    }

    /// Registers `callback` under `key`, returning any callback it replaced.
    pub fn register(&mut self, key: impl Into<String>, callback: SystemId) -> Option<SystemId> {
        self.callbacks.insert(key.into(), callback)
    }

    pub fn resolve(&self, key: &str) -> Option<SystemId> {
        self.callbacks.get(key).copied()
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.callbacks.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    UnknownCallback { key: String },
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCallback { key } => {
                write!(f, "callback '{key}' is not registered on the UI event manager")
            }
        }
    }
}

impl std::error::Error for DispatchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Invoked(SystemId),
    /// Empty key or no handler assigned.
    Skipped,
}

pub fn resolve_callback(
    key: &str,
    handler: Option<&UiEventManager>,
) -> Result<DispatchOutcome, DispatchError> {
    let Some(handler) = handler.filter(|_| !key.is_empty()) else {
        return Ok(DispatchOutcome::Skipped);
    };
    handler
        .resolve(key)
        .map(DispatchOutcome::Invoked)
        .ok_or_else(|| DispatchError::UnknownCallback {
            key: key.to_owned(),
        })
}

/// Resolves and queues the callback. Failures are logged and never propagate.
pub fn dispatch_callback(
    commands: &mut Commands,
    key: &str,
    handler: Option<&UiEventManager>,
) -> DispatchOutcome {
    match resolve_callback(key, handler) {
        Ok(DispatchOutcome::Invoked(callback)) => {
            commands.run_system(callback);
            DispatchOutcome::Invoked(callback)
        }
        Ok(DispatchOutcome::Skipped) => DispatchOutcome::Skipped,
        Err(error) => {
            warn!("BottomBar: {error}");
            DispatchOutcome::Skipped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct Calls(Vec<&'static str>);

    fn home(mut calls: ResMut<Calls>) {
        calls.0.push("home");
    }

    fn shop(mut calls: ResMut<Calls>) {
        calls.0.push("shop");
    }

    fn manager(world: &mut World) -> UiEventManager {
        let home = world.register_system(home);
        let shop = world.register_system(shop);
        UiEventManager::default()
            .with_callback("ActivateHome", home)
            .with_callback("ActivateShop", shop)
    }

    #[test]
    fn resolves_registered_keys() {
        let mut world = World::new();
        let manager = manager(&mut world);

        assert!(matches!(
            resolve_callback("ActivateShop", Some(&manager)),
            Ok(DispatchOutcome::Invoked(_))
        ));
        assert_eq!(manager.keys(), vec!["ActivateHome", "ActivateShop"]);
    }

    #[test]
    fn empty_key_or_missing_handler_is_skipped() {
        let mut world = World::new();
        let manager = manager(&mut world);

        assert_eq!(resolve_callback("", Some(&manager)), Ok(DispatchOutcome::Skipped));
        assert_eq!(resolve_callback("ActivateHome", None), Ok(DispatchOutcome::Skipped));
    }

    #[test]
    fn unknown_key_is_an_error() {
        let mut world = World::new();
        let manager = manager(&mut world);

        let error = resolve_callback("ActivateMissing", Some(&manager)).unwrap_err();
        assert_eq!(
            error,
            DispatchError::UnknownCallback {
                key: "ActivateMissing".to_owned()
            }
        );
        assert!(error.to_string().contains("ActivateMissing"));
    }

    #[test]
    fn dispatch_runs_the_registered_system() {
        let mut world = World::new();
        world.init_resource::<Calls>();
        let manager = manager(&mut world);

        {
            let mut commands = world.commands();
            dispatch_callback(&mut commands, "ActivateShop", Some(&manager));
            dispatch_callback(&mut commands, "ActivateMissing", Some(&manager));
        }
        world.flush();

        assert_eq!(world.resource::<Calls>().0, vec!["shop"]);
    }
}
