//! Canned blog content shared by the demo binary and the tests.

use crate::model::{Author, Comment, Post};
use std::sync::Arc;

pub const POST_TITLE: &str = "JSON API paints my bikeshed!";
pub const POST_BODY: &str = "Outside every fat man there was an even fatter man trying to close in";

pub fn dan() -> Arc<Author> {
    Author::new(9, "Dan", "Gebhardt")
}

/// Post 1 by people/9 with comments 5 and 12. The comments have no author.
pub fn standard_post() -> Arc<Post> {
    let comments = vec![
        Comment::new(5, "First!", None),
        Comment::new(12, "I like XML better", None),
    ];
    Arc::new(Post::new(1, POST_TITLE, POST_BODY, Some(dan()), comments))
}

/// A small, fully linked blog: two authors, three posts, comments pointing back
/// at their authors.
pub fn blog_posts() -> Vec<Arc<Post>> {
    let dan = dan();
    let steve = Author::new(10, "Steve", "Klabnik");

    let first = Comment::new(5, "First!", Some(Arc::clone(&steve)));
    let xml = Comment::new(12, "I like XML better", Some(Arc::clone(&dan)));
    let rust = Comment::new(13, "Has anyone tried this in Rust?", Some(Arc::clone(&steve)));
    steve.set_comments(vec![Arc::clone(&first), Arc::clone(&rust)]);
    dan.set_comments(vec![Arc::clone(&xml)]);

    vec![
        Arc::new(
            Post::new(1, POST_TITLE, POST_BODY, Some(Arc::clone(&dan)), vec![first, xml])
                .with_tags(["jsonapi", "design"]),
        ),
        Arc::new(Post::new(
            2,
            "Hypermedia for the rest of us",
            "Links are the engine of application state.",
            Some(Arc::clone(&steve)),
            vec![rust],
        )),
        Arc::new(Post::new(
            3,
            "Drafts",
            "Nothing to see here yet.",
            None,
            vec![],
        )),
    ]
}
