mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use common::{get, id_of, job_body, patch, post, proposal_body, put, register, Call};
use serde_json::json;

#[tokio::test]
async fn only_clients_post_jobs_and_only_owners_edit_them() -> Result<()> {
    let app = common::app();
    let alice = register(&app, "alice", "client").await?;
    let carol = register(&app, "carol", "client").await?;
    let bob = register(&app, "bob", "freelancer").await?;

    let res = post(&app, "/api/jobs", &bob.access_token, job_body(500.0)).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = Call::new(Method::POST, "/api/jobs").json(job_body(500.0)).send(&app).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = post(&app, "/api/jobs", &alice.access_token, job_body(500.0)).await?;
    let job_uri = format!("/api/jobs/{}", id_of(&res, "job"));

    let res = put(&app, &job_uri, &carol.access_token, json!({ "budget": 900 })).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = put(&app, &job_uri, &alice.access_token, json!({ "budget": 900 })).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["job"]["budget"], 900.0);

    let res = patch(
        &app,
        &format!("{}/status", job_uri),
        &alice.access_token,
        json!({ "status": "paused" }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = Call::new(Method::DELETE, &job_uri)
        .bearer(&carol.access_token)
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = Call::new(Method::DELETE, &job_uri)
        .bearer(&alice.access_token)
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::OK);

    let res = Call::new(Method::GET, &job_uri).send(&app).await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() -> Result<()> {
    let app = common::app();
    let res = Call::new(Method::GET, "/api/jobs/not-a-uuid").send(&app).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["success"], false);
    Ok(())
}

#[tokio::test]
async fn freelancer_profile_role_gate_and_uniqueness() -> Result<()> {
    let app = common::app();
    let alice = register(&app, "alice", "client").await?;
    let bob = register(&app, "bob", "freelancer").await?;
    let profile = json!({ "title": "Rust developer", "skills": ["rust", "sql"], "hourlyRate": 40 });

    let res = post(&app, "/api/freelancers", &alice.access_token, profile.clone()).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = post(&app, "/api/freelancers", &bob.access_token, profile.clone()).await?;
    assert_eq!(res.status, StatusCode::CREATED);
    let profile_id = id_of(&res, "freelancer");

    let res = post(&app, "/api/freelancers", &bob.access_token, profile).await?;
    assert_eq!(res.status, StatusCode::CONFLICT);

    let res = Call::new(Method::GET, &format!("/api/freelancers/{}", profile_id))
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Freelancer retrieved");

    let res = Call::new(Method::GET, "/api/freelancers/search").send(&app).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Skills query parameter is required");

    let res = Call::new(Method::GET, "/api/freelancers/search?skills=sql,go")
        .send(&app)
        .await?;
    assert_eq!(res.body["data"]["total"], 1);
    Ok(())
}

#[tokio::test]
async fn portfolio_items_are_indexed() -> Result<()> {
    let app = common::app();
    let bob = register(&app, "bob", "freelancer").await?;
    post(
        &app,
        "/api/freelancers",
        &bob.access_token,
        json!({ "title": "Rust developer", "hourlyRate": 40 }),
    )
    .await?;

    let res = post(
        &app,
        "/api/freelancers/portfolio",
        &bob.access_token,
        json!({ "title": "Shop", "link": "https://example.com/shop" }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["data"]["freelancer"]["portfolio"][0]["title"], "Shop");

    let res = Call::new(Method::DELETE, "/api/freelancers/portfolio/abc")
        .bearer(&bob.access_token)
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Valid portfolio index is required");

    let res = Call::new(Method::DELETE, "/api/freelancers/portfolio/3")
        .bearer(&bob.access_token)
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = Call::new(Method::DELETE, "/api/freelancers/portfolio/0")
        .bearer(&bob.access_token)
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["freelancer"]["portfolio"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn proposals_are_private_to_author_and_job_owner() -> Result<()> {
    let app = common::app();
    let alice = register(&app, "alice", "client").await?;
    let carol = register(&app, "carol", "client").await?;
    let bob = register(&app, "bob", "freelancer").await?;

    let job_id = id_of(
        &post(&app, "/api/jobs", &alice.access_token, job_body(500.0)).await?,
        "job",
    );

    let res = post(&app, "/api/proposals", &alice.access_token, proposal_body(&job_id, 400.0)).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = post(&app, "/api/proposals", &bob.access_token, proposal_body(&job_id, 400.0)).await?;
    let proposal_uri = format!("/api/proposals/{}", id_of(&res, "proposal"));

    assert_eq!(get(&app, &proposal_uri, &bob.access_token).await?.status, StatusCode::OK);
    assert_eq!(get(&app, &proposal_uri, &alice.access_token).await?.status, StatusCode::OK);
    assert_eq!(get(&app, &proposal_uri, &carol.access_token).await?.status, StatusCode::FORBIDDEN);

    let res = get(&app, &format!("/api/proposals/job/{}", job_id), &carol.access_token).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    let res = get(&app, &format!("/api/proposals/job/{}", job_id), &alice.access_token).await?;
    assert_eq!(res.body["data"]["proposals"].as_array().map(Vec::len), Some(1));

    let res = patch(
        &app,
        &format!("{}/status", proposal_uri),
        &carol.access_token,
        json!({ "status": "accepted" }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = get(&app, "/api/proposals/my-proposals", &alice.access_token).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn contracts_are_gated_by_party_and_admin_override() -> Result<()> {
    let app = common::app();
    let alice = register(&app, "alice", "client").await?;
    let bob = register(&app, "bob", "freelancer").await?;
    let mallory = register(&app, "mallory", "freelancer").await?;
    let admin = register(&app, "admin", "admin").await?;

    let job_id = id_of(
        &post(&app, "/api/jobs", &alice.access_token, job_body(500.0)).await?,
        "job",
    );
    let proposal_id = id_of(
        &post(&app, "/api/proposals", &bob.access_token, proposal_body(&job_id, 450.0)).await?,
        "proposal",
    );

    // Still pending, so no contract yet.
    let res = post(&app, "/api/contracts", &alice.access_token, json!({ "proposalId": proposal_id })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = post(&app, "/api/contracts", &alice.access_token, json!({})).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Proposal ID is required");

    patch(
        &app,
        &format!("/api/proposals/{}/status", proposal_id),
        &alice.access_token,
        json!({ "status": "accepted" }),
    )
    .await?;
    let res = post(&app, "/api/contracts", &alice.access_token, json!({ "proposalId": proposal_id })).await?;
    let contract_uri = format!("/api/contracts/{}", id_of(&res, "contract"));

    assert_eq!(get(&app, &contract_uri, &mallory.access_token).await?.status, StatusCode::FORBIDDEN);
    let res = patch(&app, &format!("{}/dispute", contract_uri), &mallory.access_token, json!({})).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let status_uri = format!("{}/status", contract_uri);
    let res = patch(&app, &status_uri, &alice.access_token, json!({ "status": "completed" })).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = patch(&app, &status_uri, &admin.access_token, json!({ "status": "completed" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = patch(&app, &status_uri, &admin.access_token, json!({ "status": "submitted" })).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Contract status updated");

    // A proposal that already backs a contract keeps its status.
    let res = patch(
        &app,
        &format!("/api/proposals/{}/status", proposal_id),
        &alice.access_token,
        json!({ "status": "rejected" }),
    )
    .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    // Jobs referenced by a contract cannot be deleted.
    let res = Call::new(Method::DELETE, &format!("/api/jobs/{}", job_id))
        .bearer(&alice.access_token)
        .send(&app)
        .await?;
    assert_eq!(res.status, StatusCode::CONFLICT);
    Ok(())
}
