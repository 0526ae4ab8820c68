use axum::{
    Json,
    body::Bytes,
    extract::{
        Multipart, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
};
use tracing::{debug, error, info, instrument, warn};

use crate::breeds::{BreedMapping, ClassificationOutcome};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    BreedMappingList, BreedMappingUpdateResponse, DogBreedResponse, EmbedResponse,
    NormalizeResponse, PairScoreRequest, PairScoreResponse,
};
use crate::gateway::state::HandlerState;
use crate::hashing::content_fingerprint;
use crate::normalize::NormalizationRequest;

/// Parsed `multipart/form-data` upload. Unknown fields are ignored.
#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    pub image: Option<Bytes>,
    pub breed: String,
    pub colors: String,
    pub features: String,
}

impl UploadForm {
    fn require_image(&mut self) -> Result<Bytes, GatewayError> {
        self.image
            .take()
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| GatewayError::InvalidRequest("missing `image` upload".to_string()))
    }
}

pub(crate) async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, GatewayError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => form.image = Some(field.bytes().await?),
            "breed" => form.breed = field.text().await?,
            "colors" => form.colors = field.text().await?,
            "features" => form.features = field.text().await?,
            other => debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(form)
}

#[instrument(skip(state, multipart))]
pub async fn dogbreed_handler(
    State(state): State<HandlerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DogBreedResponse>, GatewayError> {
    let mut form = read_upload_form(multipart?).await?;
    let image = form.require_image()?;

    debug!(
        bytes = image.len(),
        fingerprint = %content_fingerprint(&image),
        "classifying upload"
    );

    let result = classify_and_localize(&state, image).await;
    Ok(Json(DogBreedResponse { result }))
}

/// Localized breed label, or the mix label on no detection and on any failure.
async fn classify_and_localize(state: &HandlerState, image: Bytes) -> String {
    let classifier = state.classifier.clone();
    let outcome = tokio::task::spawn_blocking(move || classifier.classify(&image)).await;

    let english = match outcome {
        Ok(Ok(ClassificationOutcome::Breed(english))) => english,
        Ok(Ok(ClassificationOutcome::NoDetection)) => {
            info!("no dog detected, answering with mix label");
            return state.mix_label.to_string();
        }
        Ok(Err(e)) => {
            warn!(error = %e, "classification failed, answering with mix label");
            return state.mix_label.to_string();
        }
        Err(e) => {
            error!(error = %e, "classification task failed, answering with mix label");
            return state.mix_label.to_string();
        }
    };

    match state.breeds.localize(&english) {
        Ok(localized) => {
            info!(breed = %english, localized = %localized, "breed classified");
            localized
        }
        Err(e) => {
            error!(error = %e, breed = %english, "breed lookup failed, answering with mix label");
            state.mix_label.to_string()
        }
    }
}

#[instrument(skip(state))]
pub async fn list_mappings_handler(
    State(state): State<HandlerState>,
) -> Result<Json<BreedMappingList>, GatewayError> {
    let mappings = state.breeds.list()?;
    debug!(count = mappings.len(), "listing breed mappings");
    Ok(Json(BreedMappingList { mappings }))
}

#[instrument(skip(state, payload))]
pub async fn update_mapping_handler(
    State(state): State<HandlerState>,
    payload: Result<Json<BreedMapping>, JsonRejection>,
) -> Result<Json<BreedMappingUpdateResponse>, GatewayError> {
    let Json(mapping) = payload?;
    let english = mapping.en.trim();
    if english.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "`en` must not be empty".to_string(),
        ));
    }

    let success = state.breeds.update(english, &mapping.ko)?;
    let message = if success {
        format!("updated mapping: {} -> {}", english, mapping.ko.trim())
    } else {
        format!("unknown breed label: {}", english)
    };

    Ok(Json(BreedMappingUpdateResponse { success, message }))
}

#[instrument(skip(state, payload))]
pub async fn normalize_handler(
    State(state): State<HandlerState>,
    payload: Result<Json<NormalizationRequest>, JsonRejection>,
) -> Result<Json<NormalizeResponse>, GatewayError> {
    let Json(request) = payload?;

    let outcome = state.pipeline.run(&request).await;
    info!(
        attempts = outcome.attempts,
        state = %outcome.state,
        "caption normalized"
    );

    Ok(Json(NormalizeResponse {
        sentences: outcome.result,
    }))
}

#[instrument(skip(state, multipart))]
pub async fn embed_handler(
    State(state): State<HandlerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EmbedResponse>, GatewayError> {
    let mut form = read_upload_form(multipart?).await?;
    let image = form.require_image()?;
    let request = NormalizationRequest::new(
        std::mem::take(&mut form.breed),
        std::mem::take(&mut form.colors),
        std::mem::take(&mut form.features),
    );

    debug!(
        bytes = image.len(),
        fingerprint = %content_fingerprint(&image),
        "embedding upload"
    );

    // The image embedding does not depend on the caption, so both run concurrently.
    let image_embedder = state.embedder.clone();
    let image_task = tokio::task::spawn_blocking(move || image_embedder.embed_image(&image));
    let sentences = state.pipeline.normalize(&request).await;

    let image_embedding = image_task
        .await
        .map_err(|e| GatewayError::InternalError(e.to_string()))?
        .map_err(|e| GatewayError::EmbeddingFailed(e.to_string()))?;

    let text_embedder = state.embedder.clone();
    let texts: Vec<String> = sentences.iter().map(str::to_string).collect();
    let text_embedding = tokio::task::spawn_blocking(move || {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        text_embedder.embed_sentences(&refs)
    })
    .await
    .map_err(|e| GatewayError::InternalError(e.to_string()))?
    .map_err(|e| GatewayError::EmbeddingFailed(e.to_string()))?;

    info!(
        image_dim = image_embedding.len(),
        text_dim = text_embedding.len(),
        "embeddings generated"
    );

    Ok(Json(EmbedResponse {
        sentences,
        image: image_embedding,
        text: text_embedding,
    }))
}

#[instrument(skip(state, payload))]
pub async fn similarity_score_handler(
    State(state): State<HandlerState>,
    payload: Result<Json<PairScoreRequest>, JsonRejection>,
) -> Result<Json<PairScoreResponse>, GatewayError> {
    let Json(request) = payload?;

    let score = match &request.weights {
        Some(weights) => state.scorer.score_with_weights(
            &request.emb_a_image,
            &request.emb_a_text,
            &request.emb_b_image,
            &request.emb_b_text,
            weights,
        )?,
        None => state.scorer.score(
            &request.emb_a_image,
            &request.emb_a_text,
            &request.emb_b_image,
            &request.emb_b_text,
        )?,
    };

    info!(score, custom_weights = request.weights.is_some(), "pair scored");
    Ok(Json(PairScoreResponse { score }))
}
