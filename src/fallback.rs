//! Write side: recording missing translations in language files.
//!
//! A miss is persisted as a leaf holding the fallback text, inserted so that
//! sibling elements stay in ascending ordinal order. Existing text is never
//! overwritten and a document is saved only when something was inserted.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::{
    Arc,
    LazyLock,
    Mutex,
    PoisonError,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::document::{
    Element,
    LanguageDocument,
};
use crate::error::TranslatorError;
use crate::key::TranslationKey;
use crate::language::validate_language;
use crate::storage::{
    DocumentLayout,
    DocumentStorage,
};

/// What to do when a node already exists at the key's terminal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FillPolicy {
    /// Leave any existing node alone.
    #[default]
    SkipExisting,
    /// Also fill an existing node that has neither children nor text
    /// (e.g. `<Required />` added by hand).
    FillEmptyLeaves,
}

/// Result of [`FallbackWriter::ensure_fallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// The leaf was written and the document saved.
    Inserted,
    /// A node already existed; nothing was saved.
    AlreadyPresent,
}

/// One mutex per language file, serializing load-modify-save cycles on it.
#[derive(Debug, Default)]
pub struct FileLocks {
    /// Absolute file path -> lock.
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl FileLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock shared by every writer of `path`, however the path was spelled.
    #[must_use]
    pub fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key).or_default())
    }
}

/// Locks shared by every [`FallbackWriter`] in the process, so separate
/// translators over the same site never interleave their writes.
static FILE_LOCKS: LazyLock<FileLocks> = LazyLock::new(FileLocks::new);

/// Persists fallback translations into language files.
#[derive(Debug)]
pub struct FallbackWriter<S> {
    storage: Arc<S>,
    layout: DocumentLayout,
    policy: FillPolicy,
}

impl<S: DocumentStorage> FallbackWriter<S> {
    #[must_use]
    pub fn new(storage: Arc<S>, layout: DocumentLayout, policy: FillPolicy) -> Self {
        Self { storage, layout, policy }
    }

    #[must_use]
    pub const fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    /// Makes sure `key` has a value in `language`'s file, writing `text` if
    /// the leaf is absent.
    ///
    /// Creates the language file when it does not exist yet.
    ///
    /// # Errors
    /// - `InvalidArgument`: `language` cannot name a file
    /// - `InvalidDocument`: the file is not well-formed or has no `<language>` node
    /// - `Persistence`: reading or writing the file failed
    pub fn ensure_fallback(
        &self,
        language: &str,
        key: &TranslationKey,
        text: &str,
    ) -> Result<FallbackOutcome, TranslatorError> {
        validate_language(language)?;

        let path = self.layout.path_for(language);
        let lock = FILE_LOCKS.lock_for(&path);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !self.storage.exists(&path) {
            self.create_language_file(language, &path)?;
        }

        let mut document = self.storage.load(&path)?;
        let Some(declaration) = document.language_mut() else {
            return Err(TranslatorError::InvalidDocument {
                path,
                reason: "missing <language> element under the root".to_string(),
            });
        };

        if !insert_fallback(declaration, key.segments(), text, self.policy) {
            tracing::debug!(language, key = %key, "Translation already present, skipping");
            return Ok(FallbackOutcome::AlreadyPresent);
        }

        self.storage.save(&document, &path)?;
        tracing::info!(language, key = %key, path = %path.display(), "Added fallback translation");

        Ok(FallbackOutcome::Inserted)
    }

    fn create_language_file(&self, language: &str, path: &Path) -> Result<(), TranslatorError> {
        tracing::info!(language, path = %path.display(), "Creating language file");

        if let Some(folder) = path.parent() {
            self.storage.create_dir_all(folder)?;
        }
        self.storage.save(&LanguageDocument::new(language), path)?;
        Ok(())
    }
}

/// Walks `segments` below `parent`, inserting missing elements in sorted
/// position and setting `text` on a newly created terminal element.
///
/// Returns whether anything changed.
fn insert_fallback<S: AsRef<str>>(
    parent: &mut Element,
    segments: &[S],
    text: &str,
    policy: FillPolicy,
) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return false;
    };
    let name = first.as_ref();

    if let Some(existing) = parent.child_mut(name) {
        if !rest.is_empty() {
            // Nesting under a leaf would hide its text from lookups.
            if existing.leaf_text().is_some() {
                tracing::warn!(element = name, "Key passes through a translated leaf, skipping");
                return false;
            }
            if existing.is_vacant() {
                existing.text = None;
            }
            return insert_fallback(existing, rest, text, policy);
        }
        return match policy {
            FillPolicy::FillEmptyLeaves
                if existing.is_vacant() && existing.text.as_deref() != Some(text) =>
            {
                existing.text = Some(text.to_string());
                true
            }
            FillPolicy::FillEmptyLeaves | FillPolicy::SkipExisting => false,
        };
    }

    let mut created = Element::new(name);
    if rest.is_empty() {
        created.text = Some(text.to_string());
    } else {
        insert_fallback(&mut created, rest, text, policy);
    }
    parent.insert_sorted(created);
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::path::PathBuf;

    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_utils::{
        child_names,
        key,
    };

    const EN_PATH: &str = "lang/en_website.xml";

    fn writer(storage: &Arc<MemoryStorage>, policy: FillPolicy) -> FallbackWriter<MemoryStorage> {
        FallbackWriter::new(
            Arc::clone(storage),
            DocumentLayout::new("lang", "{language}_website.xml"),
            policy,
        )
    }

    fn load(storage: &MemoryStorage) -> LanguageDocument {
        storage.load(&PathBuf::from(EN_PATH)).unwrap()
    }

    #[fixture]
    fn storage() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::new())
    }

    #[rstest]
    fn creates_missing_language_file(storage: Arc<MemoryStorage>) {
        let writer = writer(&storage, FillPolicy::SkipExisting);

        let outcome =
            writer.ensure_fallback("en", &key("Errors/Required"), "{0} is required").unwrap();

        assert_that!(outcome, eq(FallbackOutcome::Inserted));
        assert_that!(storage.has_directory(Path::new("lang")), eq(true));
        let document = load(&storage);
        assert_that!(document.lookup(&key("Errors/Required")), some(eq("{0} is required")));
        let declaration = document.language().unwrap();
        assert_that!(declaration.attribute("name"), some(eq("English")));
        assert_that!(declaration.attribute("id"), some(eq("en")));
        assert_that!(declaration.child("Errors").unwrap().text, none());
    }

    #[rstest]
    fn second_call_is_a_no_op(storage: Arc<MemoryStorage>) {
        let writer = writer(&storage, FillPolicy::SkipExisting);
        writer.ensure_fallback("en", &key("Errors/Required"), "{0} is required").unwrap();
        let saves = storage.save_count();
        let before = storage.contents(Path::new(EN_PATH));

        let outcome =
            writer.ensure_fallback("en", &key("Errors/Required"), "{0} is required").unwrap();

        assert_that!(outcome, eq(FallbackOutcome::AlreadyPresent));
        assert_that!(storage.save_count(), eq(saves));
        assert_eq!(storage.contents(Path::new(EN_PATH)), before);
    }

    #[rstest]
    fn never_overwrites_translator_text(storage: Arc<MemoryStorage>) {
        storage.insert(
            EN_PATH,
            r#"<languages><language name="English" id="en"><Errors><Required>Obligatoriskt</Required></Errors></language></languages>"#,
        );
        let writer = writer(&storage, FillPolicy::FillEmptyLeaves);

        let outcome =
            writer.ensure_fallback("en", &key("Errors/Required"), "[/Errors/Required]").unwrap();

        assert_that!(outcome, eq(FallbackOutcome::AlreadyPresent));
        assert_that!(load(&storage).lookup(&key("Errors/Required")), some(eq("Obligatoriskt")));
        assert_that!(storage.save_count(), eq(0));
    }

    #[rstest]
    fn keeps_siblings_sorted(storage: Arc<MemoryStorage>) {
        let writer = writer(&storage, FillPolicy::SkipExisting);

        for raw in ["Zebra/Leaf", "Apple/Leaf", "Mango/Leaf", "Apple/Core", "Banana"] {
            writer.ensure_fallback("en", &key(raw), "x").unwrap();
        }

        let document = load(&storage);
        let declaration = document.language().unwrap();
        assert_that!(
            child_names(declaration),
            elements_are![eq("Apple"), eq("Banana"), eq("Mango"), eq("Zebra")]
        );
        assert_that!(
            child_names(declaration.child("Apple").unwrap()),
            elements_are![eq("Core"), eq("Leaf")]
        );
    }

    #[rstest]
    fn inserts_into_existing_parent_in_order(storage: Arc<MemoryStorage>) {
        storage.insert(
            EN_PATH,
            r#"<languages><language name="English" id="en"><Errors><Email>Bad email</Email><Required>Required</Required></Errors></language></languages>"#,
        );
        let writer = writer(&storage, FillPolicy::SkipExisting);

        writer.ensure_fallback("en", &key("Errors/Range"), "Out of range").unwrap();

        let document = load(&storage);
        assert_that!(
            child_names(document.language().unwrap().child("Errors").unwrap()),
            elements_are![eq("Email"), eq("Range"), eq("Required")]
        );
        assert_that!(document.lookup(&key("Errors/Email")), some(eq("Bad email")));
    }

    #[rstest]
    #[case::skip_existing(FillPolicy::SkipExisting, None, FallbackOutcome::AlreadyPresent)]
    #[case::fill_empty(
        FillPolicy::FillEmptyLeaves,
        Some("[/Errors/Required]"),
        FallbackOutcome::Inserted
    )]
    fn empty_terminal_node_follows_policy(
        storage: Arc<MemoryStorage>,
        #[case] policy: FillPolicy,
        #[case] expected_text: Option<&str>,
        #[case] expected_outcome: FallbackOutcome,
    ) {
        storage.insert(
            EN_PATH,
            r#"<languages><language name="English" id="en"><Errors><Required /></Errors></language></languages>"#,
        );
        let writer = writer(&storage, policy);

        let outcome =
            writer.ensure_fallback("en", &key("Errors/Required"), "[/Errors/Required]").unwrap();

        assert_that!(outcome, eq(expected_outcome));
        assert_eq!(load(&storage).lookup(&key("Errors/Required")), expected_text);
    }

    #[rstest]
    #[case::skip_existing(FillPolicy::SkipExisting)]
    #[case::fill_empty(FillPolicy::FillEmptyLeaves)]
    fn intermediate_terminal_node_is_never_filled(
        storage: Arc<MemoryStorage>,
        #[case] policy: FillPolicy,
    ) {
        storage.insert(
            EN_PATH,
            r#"<languages><language name="English" id="en"><Errors><Required>Required</Required></Errors></language></languages>"#,
        );
        let writer = writer(&storage, policy);

        let outcome = writer.ensure_fallback("en", &key("Errors"), "[/Errors]").unwrap();

        assert_that!(outcome, eq(FallbackOutcome::AlreadyPresent));
        let document = load(&storage);
        let errors = document.language().unwrap().child("Errors").unwrap();
        assert_that!(errors.text, none());
    }

    #[rstest]
    fn never_nests_under_a_translated_leaf(storage: Arc<MemoryStorage>) {
        storage.insert(
            EN_PATH,
            r#"<languages><language name="English" id="en"><Title>Home</Title></language></languages>"#,
        );
        let writer = writer(&storage, FillPolicy::SkipExisting);

        let outcome = writer.ensure_fallback("en", &key("Title/Sub"), "[/Title/Sub]").unwrap();

        assert_that!(outcome, eq(FallbackOutcome::AlreadyPresent));
        assert_that!(load(&storage).lookup(&key("Title")), some(eq("Home")));
        assert_that!(storage.save_count(), eq(0));
    }

    #[rstest]
    fn rejects_file_without_language_node(storage: Arc<MemoryStorage>) {
        let original = "<translations><Errors/></translations>";
        storage.insert(EN_PATH, original);
        let writer = writer(&storage, FillPolicy::SkipExisting);

        let result = writer.ensure_fallback("en", &key("Errors/Required"), "x");

        assert!(matches!(result, Err(TranslatorError::InvalidDocument { .. })));
        assert_that!(storage.contents(Path::new(EN_PATH)), some(eq(original)));
    }

    #[rstest]
    fn rejects_malformed_file(storage: Arc<MemoryStorage>) {
        storage.insert(EN_PATH, "<languages><language>");
        let writer = writer(&storage, FillPolicy::SkipExisting);

        let result = writer.ensure_fallback("en", &key("Errors/Required"), "x");

        assert!(matches!(result, Err(TranslatorError::InvalidDocument { .. })));
        assert_that!(storage.save_count(), eq(0));
    }

    #[rstest]
    fn rejects_language_that_cannot_name_a_file(storage: Arc<MemoryStorage>) {
        let writer = writer(&storage, FillPolicy::SkipExisting);

        let result = writer.ensure_fallback("../en", &key("Errors/Required"), "x");

        assert!(matches!(result, Err(TranslatorError::InvalidArgument { .. })));
        assert_that!(storage.save_count(), eq(0));
    }

    #[rstest]
    #[case::skip_existing(FillPolicy::SkipExisting)]
    #[case::fill_empty(FillPolicy::FillEmptyLeaves)]
    fn blank_fallback_is_kept_and_written_once(
        storage: Arc<MemoryStorage>,
        #[case] policy: FillPolicy,
    ) {
        let writer = writer(&storage, policy);

        let first = writer.ensure_fallback("en", &key("Spacer"), " ").unwrap();
        let second = writer.ensure_fallback("en", &key("Spacer"), " ").unwrap();

        assert_that!(first, eq(FallbackOutcome::Inserted));
        assert_that!(second, eq(FallbackOutcome::AlreadyPresent));
        let document = load(&storage);
        assert_that!(document.language().unwrap().child("Spacer").unwrap().text, some(eq(" ")));
    }

    #[rstest]
    fn nests_under_a_blank_element(storage: Arc<MemoryStorage>) {
        storage.insert(
            EN_PATH,
            "<languages><language name=\"English\" id=\"en\"><Errors>\n  </Errors></language></languages>",
        );
        let writer = writer(&storage, FillPolicy::SkipExisting);

        let outcome = writer.ensure_fallback("en", &key("Errors/Required"), "x").unwrap();

        assert_that!(outcome, eq(FallbackOutcome::Inserted));
        let document = load(&storage);
        assert_that!(document.lookup(&key("Errors/Required")), some(eq("x")));
        assert_that!(document.language().unwrap().child("Errors").unwrap().text, none());
    }

    #[rstest]
    fn file_locks_are_shared_per_file() {
        let locks = FileLocks::new();
        let cwd = std::env::current_dir().unwrap();

        let relative = locks.lock_for(Path::new("lang/en_website.xml"));
        let absolute = locks.lock_for(&cwd.join("lang").join("en_website.xml"));
        let other = locks.lock_for(Path::new("lang/sv_website.xml"));

        assert_that!(Arc::ptr_eq(&relative, &absolute), eq(true));
        assert_that!(Arc::ptr_eq(&relative, &other), eq(false));
    }

    #[rstest]
    fn writers_over_one_storage_never_lose_insertions(storage: Arc<MemoryStorage>) {
        let writers = [
            writer(&storage, FillPolicy::SkipExisting),
            writer(&storage, FillPolicy::SkipExisting),
        ];
        let leaves: Vec<String> = (0..12).map(|i| format!("Key{i:02}")).collect();

        std::thread::scope(|scope| {
            for (i, leaf) in leaves.iter().enumerate() {
                let writer = &writers[i % writers.len()];
                scope.spawn(move || {
                    writer.ensure_fallback("en", &key(&format!("Generated/{leaf}")), "x").unwrap()
                });
            }
        });

        let document = load(&storage);
        let generated = document.language().unwrap().child("Generated").unwrap();
        assert_eq!(child_names(generated), leaves);
    }
}
