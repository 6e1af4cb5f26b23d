//! Active-language context.

use crate::{Arg, Catalog, Direction, I18nError, I18nResult, Language};

/// Callback run after the active language changes.
pub type Observer = Box<dyn FnMut(Locale<'_>) -> Result<(), I18nError> + Send>;

/// Handle returned by [`LocaleContext::add_observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl From<ObserverId> for u64 {
    fn from(id: ObserverId) -> u64 {
        id.0
    }
}

impl From<u64> for ObserverId {
    fn from(raw: u64) -> Self {
        ObserverId(raw)
    }
}

/// Outcome of a language switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchReport {
    pub previous: Language,
    pub current: Language,
    pub notified: usize,
    pub failed: usize,
}

/// Borrowed view of a catalog in one language, handed to rendering code.
#[derive(Debug, Clone, Copy)]
pub struct Locale<'a> {
    catalog: &'a Catalog,
    language: Language,
}

impl<'a> Locale<'a> {
    pub fn new(catalog: &'a Catalog, language: Language) -> Self {
        Self { catalog, language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn direction(&self) -> Direction {
        self.language.direction()
    }

    pub fn is_rtl(&self) -> bool {
        self.language.is_rtl()
    }

    /// Text for a key in this locale.
    pub fn text(&self, key: &'a str) -> &'a str {
        self.catalog.get(self.language, key)
    }

    pub fn format(&self, key: &str, args: &[(&str, Arg)]) -> String {
        self.catalog.format(self.language, key, args)
    }

    /// The same catalog viewed in another language.
    pub fn in_language(&self, language: Language) -> Locale<'a> {
        Locale::new(self.catalog, language)
    }
}

/// Owns the catalog, the active language and the language-change observers.
pub struct LocaleContext {
    catalog: Catalog,
    language: Language,
    observers: Vec<(ObserverId, Observer)>,
    next_id: u64,
}

impl LocaleContext {
    pub fn new(catalog: Catalog, language: Language) -> Self {
        Self {
            catalog,
            language,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Context over the builtin catalogs.
    pub fn with_builtin(language: Language) -> I18nResult<Self> {
        Ok(Self::new(Catalog::builtin()?, language))
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn locale(&self) -> Locale<'_> {
        Locale::new(&self.catalog, self.language)
    }

    /// Register an observer. It runs on every subsequent language switch.
    pub fn add_observer<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(Locale<'_>) -> Result<(), I18nError> + Send + 'static,
    {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the observer was not registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Make `language` active and notify every observer.
    ///
    /// A failing observer is logged and does not stop the others.
    pub fn set_language(&mut self, language: Language) -> SwitchReport {
        let previous = self.language;
        self.language = language;

        let locale = Locale::new(&self.catalog, language);
        let mut failed = 0;
        for (id, observer) in self.observers.iter_mut() {
            if let Err(e) = observer(locale) {
                failed += 1;
                tracing::warn!(observer = id.0, error = %e, "language observer failed");
            }
        }

        tracing::info!(from = %previous, to = %language, "language switched");

        SwitchReport {
            previous,
            current: language,
            notified: self.observers.len() - failed,
            failed,
        }
    }

    /// Switch by language code.
    pub fn set_language_code(&mut self, code: &str) -> I18nResult<SwitchReport> {
        let language = code.parse()?;
        Ok(self.set_language(language))
    }

    /// Switch to the other supported language.
    pub fn toggle(&mut self) -> SwitchReport {
        self.set_language(self.language.toggled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn context() -> LocaleContext {
        LocaleContext::with_builtin(Language::English).unwrap()
    }

    #[test]
    fn test_locale_reads_active_language() {
        let mut ctx = context();
        assert_eq!(ctx.locale().text("tab_records"), "📋 Records");
        ctx.set_language(Language::Arabic);
        assert_eq!(ctx.locale().text("tab_records"), "📋 السجلات");
        assert!(ctx.locale().is_rtl());
        assert_eq!(
            ctx.locale().in_language(Language::English).text("tab_records"),
            "📋 Records"
        );
    }

    #[test]
    fn test_observers_receive_new_text() {
        let mut ctx = context();
        let shown = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..3 {
            let shown = Arc::clone(&shown);
            ctx.add_observer(move |locale| {
                shown.lock().unwrap().push(locale.text("btn_save").to_string());
                Ok(())
            });
        }

        let report = ctx.set_language(Language::Arabic);
        assert_eq!(report.notified, 3);
        assert_eq!(report.failed, 0);
        assert_eq!(*shown.lock().unwrap(), vec!["حفظ"; 3]);
    }

    #[test]
    fn test_failing_observer_does_not_block_others() {
        let mut ctx = context();
        let hits = Arc::new(Mutex::new(0));

        ctx.add_observer(|_| Err(I18nError::Observer("widget gone".into())));
        let counter = Arc::clone(&hits);
        ctx.add_observer(move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        let report = ctx.toggle();
        assert_eq!(report.previous, Language::English);
        assert_eq!(report.current, Language::Arabic);
        assert_eq!(report.failed, 1);
        assert_eq!(report.notified, 1);
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn test_same_language_still_notifies() {
        let mut ctx = context();
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        ctx.add_observer(move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        let report = ctx.set_language(Language::English);
        assert_eq!(report.previous, report.current);
        assert_eq!(report.notified, 1);
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn test_remove_observer() {
        let mut ctx = context();
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        let id = ctx.add_observer(move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        assert!(ctx.remove_observer(id));
        assert!(!ctx.remove_observer(id));
        ctx.toggle();
        assert_eq!(*hits.lock().unwrap(), 0);
        assert_eq!(ctx.observer_count(), 0);
    }

    #[test]
    fn test_set_language_code() {
        let mut ctx = context();
        assert!(ctx.set_language_code("ar").is_ok());
        assert_eq!(ctx.language(), Language::Arabic);
        assert!(ctx.set_language_code("de").is_err());
        assert_eq!(ctx.language(), Language::Arabic);
    }
}
