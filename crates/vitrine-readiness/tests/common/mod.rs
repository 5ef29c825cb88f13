//! Scriptable document double.

#![allow(dead_code)]

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use vitrine_readiness::{DocumentHost, FontLoadError, ReadyState, SheetAccess};

/// How `fonts_ready` behaves.
#[derive(Debug, Clone)]
pub enum FontsReady {
    After(Duration),
    Fails,
    Never,
}

#[derive(Debug)]
pub struct FakeHost {
    pub font_api: bool,
    pub fonts_ready: FontsReady,
    /// Fonts report loaded once this many checks have been made.
    pub fonts_loaded_after_checks: Option<usize>,
    pub sheets: Mutex<Vec<SheetAccess>>,
    pub ready_state: ReadyState,
    /// Delay until the load event fires, `None` for never.
    pub load_after: Option<Duration>,
    pub font_checks: Mutex<usize>,
    pub classes: Mutex<HashSet<String>>,
    pub class_adds: Mutex<usize>,
    pub events: Mutex<Vec<String>>,
}

impl FakeHost {
    /// A fully loaded document.
    pub fn loaded() -> Self {
        Self {
            font_api: true,
            fonts_ready: FontsReady::After(Duration::ZERO),
            fonts_loaded_after_checks: Some(0),
            sheets: Mutex::new(vec![SheetAccess::Rules(10)]),
            ready_state: ReadyState::Complete,
            load_after: None,
            font_checks: Mutex::new(0),
            classes: Mutex::new(HashSet::new()),
            class_adds: Mutex::new(0),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn class_adds(&self) -> usize {
        *self.class_adds.lock().unwrap()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentHost for FakeHost {
    fn has_font_api(&self) -> bool {
        self.font_api
    }

    async fn fonts_ready(&self) -> Result<(), FontLoadError> {
        match &self.fonts_ready {
            FontsReady::After(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(())
            }
            FontsReady::Fails => Err(FontLoadError("network".to_string())),
            FontsReady::Never => std::future::pending().await,
        }
    }

    fn check_font(&self, _descriptor: &str) -> bool {
        let mut checks = self.font_checks.lock().unwrap();
        *checks += 1;
        self.fonts_loaded_after_checks
            .is_some_and(|needed| *checks > needed)
    }

    fn stylesheets(&self) -> Vec<SheetAccess> {
        self.sheets.lock().unwrap().clone()
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    async fn load_event(&self) {
        match self.load_after {
            Some(delay) => tokio::time::sleep(delay).await,
            None => std::future::pending().await,
        }
    }

    fn add_class(&self, class: &str) {
        *self.class_adds.lock().unwrap() += 1;
        self.classes.lock().unwrap().insert(class.to_string());
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.lock().unwrap().contains(class)
    }

    fn dispatch_event(&self, name: &str) {
        self.events.lock().unwrap().push(name.to_string());
    }
}
