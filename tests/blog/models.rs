//! The blog sample domain: blogs, posts, and tags.

use crud_rust::Entity;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Entity)]
#[entity(collection = "blogs")]
pub struct Blog {
    #[entity(key)]
    pub id: i32,
    pub author: String,
    pub title: String,
    pub summary: String,
    pub image_url: String,
    #[serde(default)]
    pub posts: Vec<Post>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Entity)]
#[entity(collection = "posts")]
pub struct Post {
    #[entity(key)]
    pub id: i32,
    pub blog_id: i32,
    pub title: String,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Entity)]
#[entity(collection = "tags")]
pub struct Tag {
    #[entity(key)]
    pub id: i32,
    pub name: String,
    pub description: String,
}

pub fn tag(id: i32, name: &str, description: &str) -> Tag {
    Tag {
        id,
        name: name.into(),
        description: description.into(),
    }
}

pub fn blog(author: &str, title: &str) -> Blog {
    Blog {
        id: 0,
        author: author.into(),
        title: title.into(),
        summary: format!("{} in brief", title),
        image_url: format!("/images/{}.png", title.to_lowercase()),
        posts: Vec::new(),
    }
}
