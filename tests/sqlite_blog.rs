//! Integration tests for the blog sample over the SQLite backend.

#![cfg(feature = "sqlite")]

use crud_rust::{Entity, Query, Repository, RepositoryExtended, SqliteRepository};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Entity)]
#[entity(collection = "blogs")]
struct Blog {
    #[entity(key)]
    id: i32,
    author: String,
    title: String,
    #[serde(default)]
    posts: Vec<Post>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Entity)]
#[entity(collection = "posts")]
struct Post {
    #[entity(key)]
    id: i32,
    blog_id: i32,
    title: String,
}

fn blog(id: i32, author: &str, title: &str) -> Blog {
    Blog {
        id,
        author: author.into(),
        title: title.into(),
        posts: Vec::new(),
    }
}

fn post(id: i32, blog_id: i32, title: &str) -> Post {
    Post {
        id,
        blog_id,
        title: title.into(),
    }
}

/// Blogs and posts stored in the same database file, with a loader that
/// eagerly materializes each blog's posts when the query includes them.
fn open_blog_store(path: &std::path::Path) -> SqliteRepository<Blog> {
    SqliteRepository::<Blog>::open(path)
        .unwrap()
        .with_include("posts", |conn, blog| {
            let mut stmt = conn.prepare(
                "SELECT body FROM posts
                 WHERE json_extract(body, '$.blog_id') = ?1
                 ORDER BY id;",
            )?;
            let mut rows = stmt.query(rusqlite::params![blog.id])?;
            let mut posts = Vec::new();
            while let Some(row) = rows.next()? {
                let body: String = row.get(0)?;
                posts.push(
                    serde_json::from_str(&body)
                        .map_err(|e| crud_rust::RepositoryError::Serde(e.to_string()))?,
                );
            }
            blog.posts = posts;
            Ok(())
        })
}

#[test]
fn include_materializes_each_blogs_posts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blog.db");

    let posts = SqliteRepository::<Post>::open(&path).unwrap();
    posts.insert(post(1, 10, "Ownership")).unwrap();
    posts.insert(post(2, 10, "Borrowing")).unwrap();
    posts.insert(post(3, 11, "Macros")).unwrap();

    let blogs = open_blog_store(&path);
    blogs.insert(blog(10, "ada", "Learning Rust")).unwrap();
    blogs.insert(blog(11, "grace", "Metaprogramming")).unwrap();

    let loaded = blogs
        .get(
            Query::new()
                .include("posts")
                .order_by_key(|b: &Blog| b.id),
        )
        .unwrap();

    assert_eq!(loaded.len(), 2);
    let titles: Vec<&str> = loaded[0].posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Ownership", "Borrowing"]);
    assert_eq!(loaded[1].posts.len(), 1);

    // Without the include, posts stay as stored.
    let bare = blogs.get(Query::new()).unwrap();
    assert!(bare.iter().all(|b| b.posts.is_empty()));
}

#[test]
fn filtered_projection_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blog.db");

    let blogs = SqliteRepository::<Blog>::open(&path).unwrap();
    blogs.insert(blog(1, "ada", "Typed Storage")).unwrap();
    blogs.insert(blog(2, "ada", "Borrow Checking")).unwrap();
    blogs.insert(blog(3, "grace", "Compilers")).unwrap();

    let titles: Vec<String> = blogs
        .get_projection(
            |b| b.title,
            Query::new()
                .filter(|b: &Blog| b.author == "ada")
                .order_by_key(|b: &Blog| b.title.clone()),
        )
        .unwrap();

    assert_eq!(titles, vec!["Borrow Checking", "Typed Storage"]);
}

#[test]
fn paging_window_matches_the_full_listing_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blog.db");

    let blogs = SqliteRepository::<Blog>::open(&path).unwrap();
    for i in 1..=10 {
        blogs.insert(blog(i, "ada", &format!("Entry {}", i))).unwrap();
    }

    let all = blogs.get_all(None, None).unwrap();
    let window = blogs.get_all(Some(2), Some(3)).unwrap();

    assert_eq!(all.len(), 10);
    assert_eq!(window, all[2..5].to_vec());
}
