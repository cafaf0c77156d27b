//! Integration tests for the contacts endpoints using wiremock

mod common;

use assert_matches::assert_matches;
use octadesk::{Contact, Error, ListContactsParams};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_contact() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts/abc-1"))
        .and(header("x-api-key", common::test_api_key().as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(common::load_response_fixture("contact")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server);
    let contact = client.contacts().get("abc-1").await.expect("Request failed");

    assert_eq!(contact.id.as_deref(), Some("abc-1"));
    assert_eq!(contact.name.as_deref(), Some("Jane Doe"));
    assert_eq!(contact.organization.as_ref().unwrap()["name"], "Acme");
    assert_eq!(contact.custom_fields_map()["seats"], 12);
    assert_eq!(contact.extra["status"], "active");

    mock_server.verify().await;
}

#[tokio::test]
async fn test_list_contacts_default_paging() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "abc-1", "name": "Jane Doe"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server);
    let contacts = client
        .contacts()
        .list(&ListContactsParams::default())
        .await
        .unwrap();

    assert_eq!(contacts.len(), 1);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_list_contacts_page_object_and_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "2"))
        .and(query_param("tags", "vip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(common::load_response_fixture("contact_page")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server);
    let params = ListContactsParams::default().page(2).limit(2).filter("tags", "vip");
    let contacts = client.contacts().list(&params).await.unwrap();

    let names: Vec<_> = contacts.iter().filter_map(|c| c.name.as_deref()).collect();
    assert_eq!(names, vec!["Jane Doe", "John Roe"]);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_create_contact_omits_unset_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/contacts"))
        .and(body_json(json!({
            "name": "Jane Doe",
            "emails": ["jane@example.com"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "abc-1",
            "name": "Jane Doe",
            "emails": ["jane@example.com"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server);
    let contact = Contact {
        emails: Some(vec!["jane@example.com".to_string()]),
        ..Contact::named("Jane Doe")
    };

    let created = client.contacts().create(&contact).await.unwrap();
    assert_eq!(created.id.as_deref(), Some("abc-1"));
    mock_server.verify().await;
}

#[tokio::test]
async fn test_update_uses_patch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/contacts/abc-1"))
        .and(body_json(json!({"id": "abc-1", "tags": ["vip"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc-1", "name": "Jane Doe", "tags": ["vip"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server);
    let patch = Contact {
        tags: Some(vec!["vip".to_string()]),
        ..Contact::default().with_id("abc-1")
    };

    let updated = client.contacts().update(&patch).await.unwrap();
    assert_eq!(updated.name.as_deref(), Some("Jane Doe"));
    mock_server.verify().await;
}

#[tokio::test]
async fn test_replace_uses_put_and_round_trips_unknown_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts/abc-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(common::load_response_fixture("contact")),
        )
        .mount(&mock_server)
        .await;

    let fixture: serde_json::Value =
        serde_json::from_str(&common::load_response_fixture("contact")).unwrap();

    Mock::given(method("PUT"))
        .and(path("/contacts/abc-1"))
        .and(body_json(fixture.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server);
    let contact = client.contacts().get("abc-1").await.unwrap();
    let replaced = client.contacts().replace(&contact).await.unwrap();

    assert_eq!(replaced, contact);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_update_without_id_never_calls_api() {
    let mock_server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server);
    let contact = Contact::named("No Id");

    assert_matches!(
        client.contacts().update(&contact).await,
        Err(Error::InvalidRequest(_))
    );
    assert_matches!(
        client.contacts().replace(&contact).await,
        Err(Error::InvalidRequest(_))
    );
    mock_server.verify().await;
}

#[tokio::test]
async fn test_unexpected_shape_is_response_validation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts/abc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server);
    assert_matches!(
        client.contacts().get("abc-1").await,
        Err(Error::ResponseValidation(_))
    );
}

#[tokio::test]
async fn test_missing_contact() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/contacts/nope"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Contact not found"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server);
    let error = client.contacts().get("nope").await.unwrap_err();

    assert_matches!(error, Error::NotFound { .. });
    mock_server.verify().await;
}
