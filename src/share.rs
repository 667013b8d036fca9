//! ShareLinkIssuer: derive the stable play URL for a quiz and render it
//! as a QR code. Pure derivation, no stored state; an encoding failure is
//! fatal to the request that asked for it.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use qrcode::{render::svg, QrCode};
use serde::Serialize;

use crate::error::AppError;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub quiz_url: String,
    /// `data:image/svg+xml;base64,...`, embeddable directly in an <img>.
    pub qr_data_url: String,
}

pub fn issue(quiz_id: &str, base_url: &str) -> Result<SharePayload, AppError> {
    let quiz_url = format!("{}/quiz/{}", base_url.trim_end_matches('/'), quiz_id);
    let code = QrCode::new(quiz_url.as_bytes())
        .map_err(|e| AppError::Internal(format!("QR encode failed: {e}")))?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(240, 240)
        .dark_color(svg::Color("#0f172a"))
        .light_color(svg::Color("#ffffff"))
        .build();
    Ok(SharePayload {
        quiz_url,
        qr_data_url: format!("data:image/svg+xml;base64,{}", BASE64.encode(image)),
    })
}
