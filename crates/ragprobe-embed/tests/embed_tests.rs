use ragprobe_core::traits::Embedder;
use ragprobe_embed::{get_default_embedder, HashEmbedder, HASH_EMBEDDER_DIM};

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force the hash embedder to avoid loading model weights
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder().expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), HASH_EMBEDDER_DIM);

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn different_texts_embed_differently() {
    let embedder = HashEmbedder::new(64);
    let embs = embedder
        .embed_batch(&["the cat sat".to_string(), "quarterly revenue grew".to_string()])
        .expect("embed_batch");

    let dot: f32 = embs[0].iter().zip(embs[1].iter()).map(|(a, b)| a * b).sum();
    assert!(dot < 0.99, "disjoint token sets should not be near-identical (dot={dot})");
}
