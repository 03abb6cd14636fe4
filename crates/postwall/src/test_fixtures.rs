//! 🧪 Canned API bodies for tests. Two posts, two users, three comments, and an
//! in-memory transport that serves them from the right paths.

use serde_json::{Value, json};

use crate::transport::InMemoryTransport;

pub(crate) fn posts() -> Value {
    json!([
        {
            "userId": 2,
            "id": 1,
            "title": "sunt aut facere repellat provident occaecati excepturi optio reprehenderit",
            "body": "quia et suscipit recusandae consequuntur expedita et cum"
        },
        {
            "userId": 1,
            "id": 2,
            "title": "qui est esse",
            "body": "est rerum tempore vitae sequi sint nihil reprehenderit dolor beatae"
        }
    ])
}

pub(crate) fn users() -> Value {
    json!([
        { "id": 1, "name": "Leanne Graham", "username": "Bret", "email": "Sincere@april.biz" },
        { "id": 2, "name": "Ervin Howell", "username": "Antonette", "email": "Shanna@melissa.tv" }
    ])
}

/// 💬 Interleaved on purpose: post 1, post 2, post 1.
pub(crate) fn comments() -> Value {
    json!([
        { "postId": 1, "id": 1, "name": "id labore ex et quam laborum", "email": "Eliseo@gardner.biz", "body": "laudantium enim quasi" },
        { "postId": 2, "id": 6, "name": "et fugit eligendi deleniti quidem", "email": "Presley.Mueller@myrl.com", "body": "doloribus at sed quis" },
        { "postId": 1, "id": 2, "name": "quo vero reiciendis velit similique", "email": "Jayne_Kuhic@sydney.com", "body": "est natus enim nihil" }
    ])
}

pub(crate) fn post_two_comments() -> Value {
    json!([
        { "postId": 2, "id": 6, "name": "et fugit eligendi deleniti quidem", "email": "Presley.Mueller@myrl.com", "body": "doloribus at sed quis" }
    ])
}

/// 🗃️ Every endpoint wired to the fixtures above.
pub(crate) fn happy_transport() -> InMemoryTransport {
    InMemoryTransport::new()
        .with_response("/posts", posts().to_string())
        .with_response("/users", users().to_string())
        .with_response("/comments", comments().to_string())
        .with_response("/posts/2", posts()[1].to_string())
        .with_response("/users/1", users()[0].to_string())
        .with_response("/posts/2/comments", post_two_comments().to_string())
}
