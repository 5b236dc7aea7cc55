use kmeans_viz::{Handlers, Response, VizContext};
use serde_json::{Value, json};

async fn call(handlers: &Handlers, request: Value) -> Value {
    let response: Response = handlers.handle_line(&request.to_string()).await;
    serde_json::to_value(response).unwrap()
}

#[tokio::test]
async fn generated_blobs_step_to_convergence_through_a_session() {
    let handlers = Handlers::new(VizContext { seed: Some(21), ..VizContext::default() });
    let data = call(&handlers, json!({"op": "generate_dataset", "n_points": 60, "shape": "blobs", "n_blobs": 3}))
        .await["data"]
        .clone();

    let request = json!({"op": "run_kmeans_step", "data": data.clone(), "n_clusters": 3, "init_method": "kmeans++", "session": "viewer"});
    let mut last = Value::Null;
    let mut inertia = f64::INFINITY;
    for _ in 0..100 {
        last = call(&handlers, request.clone()).await;
        assert!(last.get("error").is_none(), "{}", last);
        let current = last["inertia"].as_f64().unwrap();
        if last["iteration"].as_u64().unwrap() > 1 {
            assert!(current <= inertia * (1.0 + 1e-12) + 1e-9);
        }
        inertia = current;
        if last["convergence_reached"] == true {
            break;
        }
    }
    assert_eq!(last["convergence_reached"], true);
    assert_eq!(last["centers"].as_array().unwrap().len(), 3);
    assert!(last["labels"].as_array().unwrap().iter().all(|l| l.as_u64().unwrap() < 3));

    // A full run from the same data agrees on cluster count and labels length
    let run = call(&handlers, json!({"op": "run_kmeans", "data": data, "n_clusters": 3, "init_method": "kmeans++"})).await;
    assert_eq!(run["labels"].as_array().unwrap().len(), 60);
    let total: u64 = run["clusters"].as_array().unwrap().iter().map(|c| c["size"].as_u64().unwrap()).sum();
    assert_eq!(total, 60);

    call(&handlers, json!({"op": "reset_kmeans", "session": "viewer"})).await;
    assert!(handlers.sessions().is_empty().await);
}
