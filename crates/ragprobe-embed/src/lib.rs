//! Embedding backends behind `ragprobe_core::traits::Embedder`.
//!
//! The default backend is a BERT sentence encoder (MiniLM-family checkpoint)
//! loaded from local files and mean-pooled to a unit vector. A deterministic
//! hashing embedder stands in when `APP_USE_FAKE_EMBEDDINGS` is set, so tests
//! and offline runs never touch model weights.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use ragprobe_core::traits::Embedder;

/// Dimension of the hashing embedder, chosen to match the MiniLM checkpoint.
pub const HASH_EMBEDDER_DIM: usize = 384;

const MAX_LEN: usize = 256;

pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
}

impl BertEmbedder {
    pub fn new() -> Result<Self> {
        let device = select_device();
        let model_dir = resolve_model_dir()?;

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e)
        })?;

        let config_path = model_dir.join("config.json");
        let config: BertConfig = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: std::collections::HashMap<String, Tensor> = weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);

        let dim = config.hidden_size;
        let model = BertModel::load(vb, &config)?;
        tracing::info!(model_dir = %model_dir.display(), dim, "sentence encoder loaded");
        Ok(Self { model, tokenizer, device, dim })
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let enc = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        let mut ids = enc.get_ids().to_vec();
        let mut mask = enc.get_attention_mask().to_vec();
        if ids.len() > MAX_LEN {
            ids.truncate(MAX_LEN);
            mask.truncate(MAX_LEN);
        }
        let len = ids.len();

        let input_ids = Tensor::from_iter(ids, &self.device)?.reshape((1, len))?;
        let attention_mask = Tensor::from_iter(mask, &self.device)?.reshape((1, len))?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        // Attention-masked mean pooling over the token axis.
        let mask_f = attention_mask.to_dtype(hidden.dtype())?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask_f)?.sum(1)?;
        let counts = mask_f.sum(1)?;
        let mean = summed.broadcast_div(&counts)?;

        // L2-normalize with an epsilon guard so empty inputs stay finite.
        let norm = mean.sqr()?.sum_keepdim(1)?.sqrt()?;
        let eps = Tensor::new(&[1e-12f32], &self.device)?.unsqueeze(0)?;
        let unit = mean.broadcast_div(&norm.broadcast_add(&eps)?)?;

        let out = unit.squeeze(0)?.to_vec1::<f32>()?;
        Ok(out)
    }
}

impl Embedder for BertEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        MAX_LEN
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }
}

/// Deterministic bag-of-words embedder: each token hashes to a bucket, with a
/// small positional jitter so reordered text does not embed identically.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        usize::MAX
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

pub fn get_default_embedder() -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        tracing::info!("using deterministic hash embedder");
        return Ok(Box::new(HashEmbedder::new(HASH_EMBEDDER_DIM)));
    }
    Ok(Box::new(BertEmbedder::new()?))
}

fn select_device() -> Device {
    #[cfg(feature = "metal")]
    if let Ok(device) = Device::new_metal(0) {
        return device;
    }
    Device::Cpu
}

fn resolve_model_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            return Ok(p);
        }
    }
    if let Ok(dir) = std::env::var("MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            return Ok(p);
        }
    }
    let local = Path::new("models/all-MiniLM-L6-v2");
    if local.exists() {
        return Ok(local.to_path_buf());
    }
    Err(anyhow!(
        "Could not locate sentence-encoder model directory; set APP_MODEL_DIR or APP_USE_FAKE_EMBEDDINGS=1"
    ))
}
