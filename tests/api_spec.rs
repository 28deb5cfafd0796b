use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use curriculum_board::analysis::{AnalysisService, GeminiClient, FALLBACK_MESSAGE};
use curriculum_board::api::{create_router, AppState, AuthConfig};
use curriculum_board::models::*;
use curriculum_board::store::{MemoryStorage, Store};
use serde_json::json;

fn setup() -> TestServer {
    let state = AppState {
        store: Store::open(Box::new(MemoryStorage::new())),
        roster: Arc::new(Roster::default_department()),
        auth: AuthConfig::with_password("1234"),
        // No API key: analysis endpoints exercise the fallback path.
        analysis: AnalysisService::new(GeminiClient::new(None, "gemini-2.5-pro")),
    };
    let app = create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

async fn propose_area(server: &TestServer, name: &str, professor: &str) -> CoreArea {
    server
        .post("/api/v1/areas")
        .json(&ProposeAreaInput {
            name: name.to_string(),
            professor_id: professor.to_string(),
        })
        .await
        .json::<CoreArea>()
}

async fn propose_course(server: &TestServer, name: &str, year: u8, semester: u8, professor: &str) -> Course {
    server
        .post("/api/v1/courses")
        .json(&ProposeCourseInput {
            name: name.to_string(),
            year,
            semester,
            professor_id: professor.to_string(),
        })
        .await
        .json::<Course>()
}

mod login {
    use super::*;

    #[tokio::test]
    async fn accepts_the_shared_password_and_returns_the_identity() {
        let server = setup();

        let response = server
            .post("/api/v1/login")
            .json(&json!({ "professor_id": "p2", "password": "1234" }))
            .await;

        response.assert_status_ok();
        let professor: Professor = response.json();
        assert_eq!(professor.id, "p2");
        assert_eq!(professor.name, "Prof. Lee");
    }

    #[tokio::test]
    async fn rejects_a_wrong_password() {
        let server = setup();

        let response = server
            .post("/api/v1/login")
            .json(&json!({ "professor_id": "p1", "password": "wrong" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_an_unknown_professor() {
        let server = setup();

        let response = server
            .post("/api/v1/login")
            .json(&json!({ "professor_id": "nobody", "password": "1234" }))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}

mod roster {
    use super::*;

    #[tokio::test]
    async fn returns_the_full_roster_in_order() {
        let server = setup();

        let response = server.get("/api/v1/roster").await;

        response.assert_status_ok();
        let professors: Vec<Professor> = response.json();
        assert_eq!(professors.len(), 5);
        assert_eq!(professors[0].id, "p1");
    }
}

mod areas {
    use super::*;

    #[tokio::test]
    async fn proposes_and_lists_areas_by_rank() {
        let server = setup();
        let low = propose_area(&server, "Low", "p1").await;
        let high = propose_area(&server, "High", "p1").await;

        for professor in ["p1", "p2"] {
            server
                .post(&format!("/api/v1/areas/{}/vote", high.id))
                .json(&VoteInput {
                    professor_id: professor.to_string(),
                })
                .await
                .assert_status_ok();
        }

        let response = server.get("/api/v1/areas").await;
        response.assert_status_ok();
        let areas: Vec<CoreArea> = response.json();
        assert_eq!(areas[0].id, high.id);
        assert_eq!(areas[0].votes, 2);
        assert_eq!(areas[1].id, low.id);
    }

    #[tokio::test]
    async fn rejects_a_blank_name() {
        let server = setup();

        let response = server
            .post("/api/v1/areas")
            .json(&json!({ "name": "  ", "professor_id": "p1" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn mutation_without_a_professor_id_is_rejected() {
        let server = setup();

        // The logged-out case: the request body cannot name an acting
        // professor, so the mutation never reaches the store.
        let response = server
            .post("/api/v1/areas")
            .json(&json!({ "name": "AI" }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let areas: Vec<CoreArea> = server.get("/api/v1/areas").await.json();
        assert!(areas.is_empty());
    }

    #[tokio::test]
    async fn only_the_proposer_may_delete() {
        let server = setup();
        let area = propose_area(&server, "AI", "p1").await;

        let response = server
            .delete(&format!("/api/v1/areas/{}?professor_id=p2", area.id))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        let response = server
            .delete(&format!("/api/v1/areas/{}?professor_id=p1", area.id))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let areas: Vec<CoreArea> = server.get("/api/v1/areas").await.json();
        assert!(areas.is_empty());
    }
}

mod courses {
    use super::*;

    #[tokio::test]
    async fn proposes_and_lists_courses_by_term() {
        let server = setup();
        propose_course(&server, "Late", 3, 2, "p1").await;
        propose_course(&server, "Early", 1, 1, "p1").await;

        let courses: Vec<Course> = server.get("/api/v1/courses").await.json();
        assert_eq!(courses[0].name, "Early");
        assert_eq!(courses[1].name, "Late");
    }

    #[tokio::test]
    async fn rejects_an_invalid_term() {
        let server = setup();

        let response = server
            .post("/api/v1/courses")
            .json(&json!({ "name": "Bad", "year": 5, "semester": 1, "professor_id": "p1" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unauthorized_delete_leaves_course_and_associations_unchanged() {
        let server = setup();
        let course = propose_course(&server, "Algorithms", 2, 1, "p1").await;
        let area = propose_area(&server, "Systems", "p2").await;
        server
            .post("/api/v1/associations/toggle")
            .json(&ToggleAssociationInput {
                course_id: course.id,
                area_id: area.id,
                professor_id: "p1".to_string(),
            })
            .await
            .assert_status_ok();

        let response = server
            .delete(&format!("/api/v1/courses/{}?professor_id=p3", course.id))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        let courses: Vec<Course> = server.get("/api/v1/courses").await.json();
        assert_eq!(courses.len(), 1);
        let matrix: BooleanAssociationMap =
            server.get("/api/v1/associations/matrix").await.json();
        assert_eq!(matrix[&course.id][&area.id], true);
    }
}

mod associations {
    use super::*;

    #[tokio::test]
    async fn toggling_updates_the_cell_and_the_matrix() {
        let server = setup();
        let course = propose_course(&server, "Algorithms", 2, 1, "p1").await;
        let area = propose_area(&server, "Systems", "p2").await;

        let cell: AssociationCell = server
            .post("/api/v1/associations/toggle")
            .json(&ToggleAssociationInput {
                course_id: course.id,
                area_id: area.id,
                professor_id: "p1".to_string(),
            })
            .await
            .json();
        assert_eq!(cell.endorsed_by, vec!["p1".to_string()]);

        let cell: AssociationCell = server
            .post("/api/v1/associations/toggle")
            .json(&ToggleAssociationInput {
                course_id: course.id,
                area_id: area.id,
                professor_id: "p1".to_string(),
            })
            .await
            .json();
        assert!(cell.endorsed_by.is_empty());

        let matrix: BooleanAssociationMap =
            server.get("/api/v1/associations/matrix").await.json();
        assert_eq!(matrix[&course.id][&area.id], false);
    }

    #[tokio::test]
    async fn deleting_an_area_removes_its_cells() {
        let server = setup();
        let course = propose_course(&server, "Algorithms", 2, 1, "p1").await;
        let area = propose_area(&server, "Systems", "p2").await;
        server
            .post("/api/v1/associations/toggle")
            .json(&ToggleAssociationInput {
                course_id: course.id,
                area_id: area.id,
                professor_id: "p1".to_string(),
            })
            .await
            .assert_status_ok();

        server
            .delete(&format!("/api/v1/areas/{}?professor_id=p2", area.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let associations: AssociationMap = server.get("/api/v1/associations").await.json();
        assert!(associations
            .get(&course.id)
            .map_or(true, |row| !row.contains_key(&area.id)));
        // The course itself survives.
        let courses: Vec<Course> = server.get("/api/v1/courses").await.json();
        assert_eq!(courses.len(), 1);
    }
}

mod analysis {
    use super::*;

    #[tokio::test]
    async fn falls_back_when_no_api_key_is_configured() {
        let server = setup();
        propose_area(&server, "AI", "p1").await;

        let response = server.post("/api/v1/analysis").await;

        response.assert_status_ok();
        let outcome: serde_json::Value = response.json();
        assert_eq!(outcome["text"], FALLBACK_MESSAGE);
        assert_eq!(outcome["stale"], false);
    }

    #[tokio::test]
    async fn latest_is_404_before_any_run_and_set_afterwards() {
        let server = setup();

        server
            .get("/api/v1/analysis/latest")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server.post("/api/v1/analysis").await.assert_status_ok();

        let response = server.get("/api/v1/analysis/latest").await;
        response.assert_status_ok();
        let latest: serde_json::Value = response.json();
        assert_eq!(latest["text"], FALLBACK_MESSAGE);
        assert_eq!(latest["seq"], 1);
    }
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let server = setup();
        let response = server.get("/api/v1/health").await;
        response.assert_status_ok();
    }
}
