use jsonapi_encoder::{
    Encoder, EncoderError, EncoderOptions, Parameters, RelationshipData, ResourceRef,
    ResourceSchema, SchemaAdapter, SchemaRegistry, TopLevelLinks,
};
use jsonapi_sample::lifecycle::{blog_registry, fixtures};
use jsonapi_sample::model::{Author, Comment};
use jsonapi_sample::schemas::{AuthorSchema, CommentSchema, PostSchema};
use serde_json::{json, Value};
use std::sync::Arc;

fn options() -> EncoderOptions {
    EncoderOptions::new().with_url_prefix("http://example.com")
}

/// Registry where posts are registered through `post`, the rest as usual.
fn registry_with_post(
    post: impl Fn() -> SchemaAdapter<PostSchema> + Send + Sync + 'static,
) -> SchemaRegistry {
    let mut registry = blog_registry();
    registry.register(post);
    registry
}

/// Compares against `expected` rendered compactly, so key order counts.
fn assert_json(actual: &str, expected: Value) {
    assert_eq!(actual, serde_json::to_string(&expected).unwrap());
}

#[test]
fn test_duplicate_primary_entries_are_kept() {
    let mut registry = SchemaRegistry::new();
    registry.register(|| AuthorSchema.adapter().without_relationship("comments"));
    let encoder = Encoder::with_options(registry, options());

    let author = ResourceRef::from(fixtures::dan());
    let actual = encoder.encode_data(vec![author.clone(), author]).unwrap();

    let person = json!({
        "type": "people",
        "id": "9",
        "attributes": { "first_name": "Dan", "last_name": "Gebhardt" },
        "links": { "self": "http://example.com/people/9" }
    });
    assert_json(&actual, json!({ "data": [person.clone(), person] }));
}

#[test]
fn test_self_reference_in_duplicate_primaries_terminates() {
    // The author is put into its own `comments` relationship.
    let author = ResourceRef::from(fixtures::dan());
    let me = author.clone();
    let mut registry = SchemaRegistry::new();
    registry.register(move || {
        AuthorSchema
            .adapter()
            .with_data("comments", RelationshipData::One(me.clone()))
            .with_include_paths(Vec::<String>::new())
    });
    let encoder = Encoder::with_options(registry, options());

    let actual = encoder.encode_data(vec![author.clone(), author]).unwrap();

    let person = json!({
        "type": "people",
        "id": "9",
        "attributes": { "first_name": "Dan", "last_name": "Gebhardt" },
        "relationships": {
            "comments": { "data": { "type": "people", "id": "9" } }
        },
        "links": { "self": "http://example.com/people/9" }
    });
    assert_json(&actual, json!({ "data": [person.clone(), person] }));
}

#[test]
fn test_self_reference_with_default_include_paths() {
    // Same cycle through real model data, with `comments` followed by default.
    let author = fixtures::dan();
    let comment = Comment::new(5, "First!", Some(Arc::clone(&author)));
    author.set_comments(vec![comment]);

    let encoder = Encoder::with_options(blog_registry(), options());
    let doc = encoder
        .encode_document(ResourceRef::from(author), None, None, None)
        .unwrap()
        .document;

    // people/9 is primary, so only the comment is included.
    let included: Vec<String> = doc.included.iter().map(|r| r.identifier().to_string()).collect();
    assert_eq!(included, ["comments/5"]);
}

#[test]
fn test_field_set_hides_relationships() {
    let author = fixtures::dan();
    author.set_comments(vec![
        Comment::new(5, "First!", Some(Arc::clone(&author))),
        Comment::new(12, "I like XML better", Some(Arc::clone(&author))),
    ]);
    let encoder = Encoder::with_options(blog_registry(), options());

    let params = Parameters::new().with_field_set("people", ["last_name", "first_name"]);
    let root = ResourceRef::from(author);
    let actual = encoder
        .encode(vec![root.clone(), root], None, None, Some(&params))
        .unwrap();

    let person = json!({
        "type": "people",
        "id": "9",
        "attributes": { "first_name": "Dan", "last_name": "Gebhardt" },
        "links": { "self": "http://example.com/people/9" }
    });
    assert_json(&actual, json!({ "data": [person.clone(), person] }));
}

#[test]
fn test_standard_post() {
    let encoder = Encoder::with_options(blog_registry(), options());
    let actual = encoder
        .encode_data(ResourceRef::from(fixtures::standard_post()))
        .unwrap();

    assert_json(
        &actual,
        json!({
            "data": {
                "type": "posts",
                "id": "1",
                "attributes": {
                    "title": fixtures::POST_TITLE,
                    "body": fixtures::POST_BODY
                },
                "relationships": {
                    "author": { "data": { "type": "people", "id": "9" } },
                    "comments": { "data": [
                        { "type": "comments", "id": "5" },
                        { "type": "comments", "id": "12" }
                    ] }
                },
                "links": { "self": "http://example.com/posts/1" }
            }
        }),
    );
}

#[test]
fn test_relationships_as_references() {
    let registry = registry_with_post(|| {
        PostSchema
            .adapter()
            .with_show_as_reference("author", true)
            .with_show_as_reference("comments", true)
    });
    let encoder = Encoder::with_options(registry, options());
    let actual = encoder
        .encode_data(ResourceRef::from(fixtures::standard_post()))
        .unwrap();

    assert_json(
        &actual,
        json!({
            "data": {
                "type": "posts",
                "id": "1",
                "attributes": {
                    "title": fixtures::POST_TITLE,
                    "body": fixtures::POST_BODY
                },
                "relationships": {
                    "author": "http://example.com/posts/1/author",
                    "comments": "http://example.com/posts/1/comments"
                },
                "links": { "self": "http://example.com/posts/1" }
            }
        }),
    );
}

#[test]
fn test_null_and_empty_relationship_data() {
    let registry = registry_with_post(|| {
        PostSchema
            .adapter()
            .with_data("author", RelationshipData::Null)
            .with_data("comments", RelationshipData::Many(vec![]))
    });
    let encoder = Encoder::with_options(registry, options());
    let actual = encoder
        .encode_data(ResourceRef::from(fixtures::standard_post()))
        .unwrap();

    assert_json(
        &actual,
        json!({
            "data": {
                "type": "posts",
                "id": "1",
                "attributes": {
                    "title": fixtures::POST_TITLE,
                    "body": fixtures::POST_BODY
                },
                "relationships": {
                    "author": { "data": null },
                    "comments": { "data": [] }
                },
                "links": { "self": "http://example.com/posts/1" }
            }
        }),
    );
}

#[test]
fn test_self_and_related_links() {
    let registry = registry_with_post(|| {
        PostSchema
            .adapter()
            .with_show_self_link("author", true)
            .with_show_related_link("author", true)
            .with_show_self_link("comments", true)
            .with_show_related_link("comments", true)
    });
    let encoder = Encoder::with_options(registry, options());
    let actual = encoder
        .encode_data(ResourceRef::from(fixtures::standard_post()))
        .unwrap();

    assert_json(
        &actual,
        json!({
            "data": {
                "type": "posts",
                "id": "1",
                "attributes": {
                    "title": fixtures::POST_TITLE,
                    "body": fixtures::POST_BODY
                },
                "relationships": {
                    "author": {
                        "links": {
                            "self": "http://example.com/posts/1/relationships/author",
                            "related": "http://example.com/posts/1/author"
                        },
                        "data": { "type": "people", "id": "9" }
                    },
                    "comments": {
                        "links": {
                            "self": "http://example.com/posts/1/relationships/comments",
                            "related": "http://example.com/posts/1/comments"
                        },
                        "data": [
                            { "type": "comments", "id": "5" },
                            { "type": "comments", "id": "12" }
                        ]
                    }
                },
                "links": { "self": "http://example.com/posts/1" }
            }
        }),
    );
}

#[test]
fn test_encoding_twice_is_byte_identical() {
    let encoder = Encoder::with_options(blog_registry(), options());
    let posts: Vec<ResourceRef> = fixtures::blog_posts()
        .into_iter()
        .map(ResourceRef::from)
        .collect();
    let params = Parameters::new()
        .with_include_paths(["author.comments", "comments.author"])
        .with_field_set("comments", ["body", "author"]);

    let first = encoder.encode(posts.clone(), None, None, Some(&params)).unwrap();
    let second = encoder.encode(posts, None, None, Some(&params)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_compound_document_order_and_dedup() {
    let encoder = Encoder::with_options(blog_registry(), options());
    let posts: Vec<ResourceRef> = fixtures::blog_posts()
        .into_iter()
        .map(ResourceRef::from)
        .collect();
    let params = Parameters::new().with_include_paths(["author", "comments.author"]);

    let doc = encoder
        .encode_document(posts, None, None, Some(&params))
        .unwrap()
        .document;

    let included: Vec<String> = doc.included.iter().map(|r| r.identifier().to_string()).collect();
    // Breadth first across all posts; the comments' authors were already included.
    assert_eq!(
        included,
        ["people/9", "comments/5", "comments/12", "people/10", "comments/13"]
    );
    assert_eq!(doc.primary().len(), 3);
}

#[test]
fn test_top_level_links_meta_and_version() {
    let encoder = Encoder::with_options(
        blog_registry(),
        options().with_json_api_version("1.0"),
    );
    let value: Value = serde_json::from_str(
        &encoder
            .encode(
                None::<ResourceRef>,
                Some(TopLevelLinks::new().with_self("http://example.com/posts/404")),
                Some(json!({ "reason": "deleted" })),
                None,
            )
            .unwrap(),
    )
    .unwrap();
    assert_eq!(
        value,
        json!({
            "jsonapi": { "version": "1.0" },
            "data": null,
            "links": { "self": "http://example.com/posts/404" },
            "meta": { "reason": "deleted" }
        })
    );
}

#[test]
fn test_invalid_include_path_does_not_abort() {
    let encoder = Encoder::with_options(blog_registry(), options());
    let params = Parameters::new().with_include_paths(["author", "tags", "comments.likes"]);
    let encoded = encoder
        .encode_document(
            ResourceRef::from(fixtures::standard_post()),
            None,
            None,
            Some(&params),
        )
        .unwrap();

    assert_eq!(encoded.document.included.len(), 3);
    let warnings: Vec<String> = encoded.warnings.iter().map(ToString::to_string).collect();
    assert_eq!(
        warnings,
        [
            "Include path 'tags' does not match any relationship",
            "Include path 'comments.likes' does not match any relationship",
        ]
    );
    assert!(encoded.warnings.iter().all(|w| !w.is_fatal()));
}

#[test]
fn test_unregistered_comment_type_is_fatal() {
    let mut registry = SchemaRegistry::new();
    registry
        .register_default::<PostSchema>()
        .register_default::<AuthorSchema>();
    let encoder = Encoder::with_options(registry, options());

    let err = encoder
        .encode_data(ResourceRef::from(fixtures::standard_post()))
        .unwrap_err();
    match err {
        EncoderError::UnmappedType { type_name } => assert!(type_name.ends_with("Comment")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_comment_author_is_null_when_unknown() {
    let mut registry = SchemaRegistry::new();
    registry.register_default::<CommentSchema>();
    let encoder = Encoder::new(registry);

    let actual = encoder
        .encode_data(ResourceRef::from(Comment::new(5, "First!", None)))
        .unwrap();
    assert_json(
        &actual,
        json!({
            "data": {
                "type": "comments",
                "id": "5",
                "attributes": { "body": "First!" },
                "relationships": { "author": { "data": null } },
                "links": { "self": "/comments/5" }
            }
        }),
    );
}

#[test]
fn test_author_without_comments_renders_empty_list() {
    let encoder = Encoder::with_options(blog_registry(), options());
    let doc = encoder
        .encode_document(ResourceRef::from(Author::new(1, "Ada", "Lovelace")), None, None, None)
        .unwrap()
        .document;
    assert_eq!(
        serde_json::to_value(&doc.primary()[0].relationships).unwrap(),
        json!({ "comments": { "data": [] } })
    );
    assert!(doc.included.is_empty());
}
