use chrono::NaiveDate;
use juniper::{graphql_object, GraphQLObject};
use serde::{Deserialize, Serialize};

use super::Identified;


/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct Post {
    pub(crate) database_id: String,
    pub(crate) slug: String,
    pub(crate) status: String,
    pub(crate) title: String,
    pub(crate) excerpt: String,
    pub(crate) date: NaiveDate,
    pub(crate) featured_image: ImageNode,
    pub(crate) author: AuthorNode,
}

#[graphql_object]
impl Post {
    fn database_id(&self) -> &str {
        &self.database_id
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn excerpt(&self) -> &str {
        &self.excerpt
    }

    /// Publication date in the format `YYYY-MM-DD`.
    fn date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    fn featured_image(&self) -> &ImageNode {
        &self.featured_image
    }

    fn author(&self) -> &AuthorNode {
        &self.author
    }
}

impl Identified for Post {
    const KIND: &'static str = "post";

    fn id(&self) -> &str {
        &self.database_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, GraphQLObject)]
#[serde(deny_unknown_fields)]
pub(crate) struct ImageNode {
    pub(crate) node: Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, GraphQLObject)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct Image {
    pub(crate) source_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, GraphQLObject)]
#[serde(deny_unknown_fields)]
pub(crate) struct AuthorNode {
    pub(crate) node: Author,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, GraphQLObject)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct Author {
    pub(crate) name: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) avatar: AvatarImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, GraphQLObject)]
#[serde(deny_unknown_fields)]
pub(crate) struct AvatarImage {
    pub(crate) url: String,
}
