//! The built-in demo data used when no seed file is configured.

use chrono::NaiveDate;

use super::{Author, AuthorNode, AvatarImage, Book, Image, ImageNode, Post};


pub(super) fn books() -> Vec<Book> {
    (1..=5)
        .map(|i| Book {
            id: i.to_string(),
            title: format!("Book {i}"),
            author: format!("Author {i}"),
        })
        .collect()
}

pub(super) fn posts() -> Vec<Post> {
    // (id, date, first name, last name)
    let entries = [
        ("1", (2023, 8, 15), "John", "Doe"),
        ("2", (2023, 9, 2), "Jane", "Roe"),
        ("3", (2023, 7, 30), "John", "Doe"),
        ("4", (2023, 10, 11), "Erika", "Mustermann"),
    ];

    entries.into_iter()
        .map(|(id, (y, m, d), first_name, last_name)| Post {
            database_id: id.into(),
            slug: format!("post-{id}"),
            status: "published".into(),
            title: format!("Post {id}"),
            excerpt: format!("This is the excerpt of Post {id}"),
            date: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap_or_else(|| unreachable!("invalid seed date for post {id}")),
            featured_image: ImageNode {
                node: Image { source_url: format!("https://example.com/image{id}.jpg") },
            },
            author: AuthorNode {
                node: Author {
                    name: format!("Author {id}"),
                    first_name: first_name.into(),
                    last_name: last_name.into(),
                    avatar: AvatarImage { url: format!("https://example.com/avatar{id}.jpg") },
                },
            },
        })
        .collect()
}
