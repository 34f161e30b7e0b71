use library_lending::config::{AuthConfig, LibraryConfig};
use library_lending::{serve, AppState, LibraryService};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Value};

const KEY_HEADER: &str = "X-ADMIN-KEY";
const KEY: &str = "ADMIN";

struct TestServer {
    base_url: String,
    client: Client,
}

impl TestServer {
    async fn start() -> Self {
        let config = LibraryConfig::default();
        let library = LibraryService::from_config(&config).unwrap();
        let state = AppState::new(library, AuthConfig::default());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, state, std::future::pending()));

        Self {
            base_url: format!("http://{}/api", addr),
            client: Client::new(),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header(KEY_HEADER, KEY)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header(KEY_HEADER, KEY)
    }

    fn put(&self, path: &str) -> RequestBuilder {
        self.client
            .put(format!("{}{}", self.base_url, path))
            .header(KEY_HEADER, KEY)
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.client
            .delete(format!("{}{}", self.base_url, path))
            .header(KEY_HEADER, KEY)
    }

    async fn add_book(&self, isbn: &str) -> u64 {
        let response = self
            .post("/books")
            .json(&json!({
                "title": "Dune",
                "author": "Frank Herbert",
                "publicationYear": 1965,
                "isbn": isbn
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();
        body["id"].as_u64().unwrap()
    }

    async fn add_patron(&self, name: &str) -> u64 {
        let response = self
            .post("/patrons")
            .json(&json!({
                "name": name,
                "phoneNumber": "0123456789",
                "emailAddress": "reader@example.com"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();
        body["id"].as_u64().unwrap()
    }
}

#[tokio::test]
async fn test_requests_without_valid_key_are_rejected() {
    let server = TestServer::start().await;

    let response = server
        .client
        .get(format!("{}/books", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = server
        .client
        .get(format!("{}/books", server.base_url))
        .header(KEY_HEADER, "WRONG")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = server.get("/books").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_borrow_and_return_status_codes() {
    let server = TestServer::start().await;
    let book = server.add_book("123-1111111111").await;
    let p1 = server.add_patron("Alice").await;
    let p2 = server.add_patron("Bob").await;

    let borrow = |patron: u64| server.post(&format!("/borrow/{}/patron/{}", book, patron));
    let give_back = |patron: u64| server.put(&format!("/borrow/{}/patron/{}", book, patron));

    assert_eq!(borrow(p1).send().await.unwrap().status(), StatusCode::CREATED);
    assert_eq!(borrow(p2).send().await.unwrap().status(), StatusCode::CONFLICT);
    assert_eq!(
        give_back(p2).send().await.unwrap().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(give_back(p1).send().await.unwrap().status(), StatusCode::OK);
    assert_eq!(borrow(p2).send().await.unwrap().status(), StatusCode::CREATED);

    let response = server.get(&format!("/books/{}", book)).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["isBorrowed"], json!(true));

    let response = server
        .get(&format!("/books/{}/loans", book))
        .send()
        .await
        .unwrap();
    let loans: Vec<Value> = response.json().await.unwrap();
    assert_eq!(loans.len(), 2);
    assert!(loans[0]["returnedAt"].is_string());
    assert!(loans[1]["returnedAt"].is_null());

    let response = server.get("/borrow").send().await.unwrap();
    let open: Vec<Value> = response.json().await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0]["patronId"], json!(p2));
}

#[tokio::test]
async fn test_borrow_unknown_entities_is_not_found() {
    let server = TestServer::start().await;
    let book = server.add_book("123-1111111111").await;

    let response = server
        .post(&format!("/borrow/{}/patron/42", book))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], json!("Patron not found with id: 42"));

    let response = server.post("/borrow/42/patron/1").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_crud() {
    let server = TestServer::start().await;
    let id = server.add_book("123-1111111111").await;

    let response = server
        .post("/books")
        .json(&json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "publicationYear": 1965,
            "isbn": "123-1111111111"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = server
        .put(&format!("/books/{}", id))
        .json(&json!({
            "title": "Dune Messiah",
            "author": "Frank Herbert",
            "publicationYear": 1969,
            "isbn": "123-1111111111"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["title"], json!("Dune Messiah"));
    assert_eq!(body["publicationYear"], json!(1969));

    let response = server.get("/books").send().await.unwrap();
    let books: Vec<Value> = response.json().await.unwrap();
    assert_eq!(books.len(), 1);

    let response = server.delete(&format!("/books/{}", id)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server.get(&format!("/books/{}", id)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server.delete(&format!("/books/{}", id)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patron_crud() {
    let server = TestServer::start().await;
    let id = server.add_patron("Alice").await;

    let response = server
        .put(&format!("/patrons/{}", id))
        .json(&json!({
            "name": "Alice Liddell",
            "phoneNumber": "9876543210",
            "emailAddress": "alice@library.org"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = server.get(&format!("/patrons/{}", id)).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], json!("Alice Liddell"));
    assert_eq!(body["emailAddress"], json!("alice@library.org"));

    let response = server.delete(&format!("/patrons/{}", id)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = server.get("/patrons").send().await.unwrap();
    let patrons: Vec<Value> = response.json().await.unwrap();
    assert!(patrons.is_empty());
}

#[tokio::test]
async fn test_invalid_bodies_are_bad_requests() {
    let server = TestServer::start().await;

    let response = server
        .post("/books")
        .json(&json!({
            "title": "Dune!",
            "author": "Frank Herbert",
            "publicationYear": 1965,
            "isbn": "123-1111111111"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/books")
        .json(&json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "publicationYear": 1965,
            "isbn": "1231111111111"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/patrons")
        .json(&json!({
            "name": "Alice",
            "phoneNumber": "12345",
            "emailAddress": "reader@example.com"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/patrons")
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let server = TestServer::start().await;

    let response = server.get("/shelves").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_non_numeric_ids_are_json_bad_requests() {
    let server = TestServer::start().await;

    for path in ["/books/abc", "/patrons/-1", "/books/abc/loans"] {
        let response = server.get(path).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string(), "{}", path);
    }

    let response = server.post("/borrow/1/patron/x").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Validation error on path"));
}
