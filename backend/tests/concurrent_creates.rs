//! Concurrent creates for one author must all land in the author's list.

use std::collections::HashSet;

use actix_web::http::StatusCode;
use actix_web::test;
use futures::future::join_all;
use rstest::rstest;
use serde_json::Value;

mod support;

use support::{MemoryBoard, create_payload, message_id};

#[rstest]
#[case(8)]
#[case(32)]
#[actix_web::test]
async fn concurrent_creates_are_all_recorded(#[case] count: usize) {
    let board = MemoryBoard::new();
    let ada = board.seed_user("ada").await;
    let app = test::init_service(board.app()).await;

    let requests = (0..count).map(|n| {
        let req = test::TestRequest::post()
            .uri("/messages")
            .set_json(create_payload(ada.id(), &format!("post {n}"), "text"))
            .to_request();
        test::call_service(&app, req)
    });
    let responses = join_all(requests).await;

    let mut created = HashSet::new();
    for res in responses {
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        created.insert(message_id(&body));
    }

    let recorded = board.messages_of(ada.id()).await;
    assert_eq!(recorded.len(), count, "no lost updates on the author list");
    assert_eq!(recorded.into_iter().collect::<HashSet<_>>(), created);
}
