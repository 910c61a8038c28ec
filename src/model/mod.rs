//! Items that define the domain data model.
//!
//! Books and posts are plain data loaded once at startup. They are exposed
//! via the API, but also (de)serialized from seed files, so they live here and
//! not in `api`. The `Store` owns both collections and is shared read-only
//! between all requests.

use std::{collections::HashSet, fs, path::Path};

use serde::Deserialize;

use crate::{config::DataConfig, prelude::*};

mod book;
mod post;
mod seed;

pub(crate) use self::{
    book::Book,
    post::{Author, AuthorNode, AvatarImage, Image, ImageNode, Post},
};


/// Something with a stable, unique identifier within its collection.
pub(crate) trait Identified {
    /// Name of the kind of item, used in error messages.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// The in-memory collections. Created once at startup and never modified.
#[derive(Debug)]
pub(crate) struct Store {
    books: Vec<Book>,
    posts: Vec<Post>,
}

/// Layout of a seed file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedFile {
    #[serde(default)]
    books: Vec<Book>,
    #[serde(default)]
    posts: Vec<Post>,
}

impl Store {
    /// Creates a store from the given collections, checking that IDs are
    /// unique within each collection.
    pub(crate) fn new(books: Vec<Book>, posts: Vec<Post>) -> Result<Self> {
        check_unique_ids(&books)?;
        check_unique_ids(&posts)?;
        Ok(Self { books, posts })
    }

    /// The built-in demo data.
    pub(crate) fn seed() -> Self {
        Self {
            books: seed::books(),
            posts: seed::posts(),
        }
    }

    /// Loads the store from the YAML seed file at `path`.
    pub(crate) fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .context(format!("failed to read seed file '{}'", path.display()))?;
        Self::from_yaml(&raw)
            .context(format!("invalid seed file '{}'", path.display()))
    }

    fn from_yaml(src: &str) -> Result<Self> {
        let SeedFile { books, posts } = serde_yaml::from_str(src)?;
        Self::new(books, posts)
    }

    /// Loads the seed file configured in `config` or falls back to the
    /// built-in data if none is configured.
    pub(crate) fn load(config: &DataConfig) -> Result<Self> {
        let store = match &config.seed_file {
            Some(path) => Self::load_from(path)?
                .tap(|_| info!("Loaded data from '{}'", path.display())),
            None => {
                debug!("No seed file configured, using built-in data");
                Self::seed()
            }
        };

        info!("Store contains {} books and {} posts", store.books.len(), store.posts.len());
        Ok(store)
    }

    pub(crate) fn books(&self) -> &[Book] {
        &self.books
    }

    pub(crate) fn posts(&self) -> &[Post] {
        &self.posts
    }
}

fn check_unique_ids<T: Identified>(items: &[T]) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        if item.id().is_empty() {
            bail!("{} with empty ID", T::KIND);
        }
        if !seen.insert(item.id()) {
            bail!("duplicate {} ID '{}'", T::KIND, item.id());
        }
    }

    Ok(())
}
