//! Photo payload decoding: raw base64 or `data:<mime>;base64,<payload>`.

use base64::Engine;
use halal_types::models::SUPPORTED_IMAGE_TYPES;
use halal_types::{ClassifyError, ImagePayload};

const DEFAULT_MIME: &str = "image/jpeg";

/// Inline image ceiling accepted by the provider, with headroom for the request envelope.
pub const MAX_IMAGE_BYTES: usize = 15 * 1024 * 1024;

pub fn decode_image(encoded: &str) -> Result<ImagePayload, ClassifyError> {
    let encoded = encoded.trim();
    let (mime_type, data) = match encoded.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| ClassifyError::invalid("data URL has no payload"))?;
            let mut params = header.split(';');
            let mime = params.next().unwrap_or_default().trim();
            if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
                return Err(ClassifyError::invalid("data URL must be base64-encoded"));
            }
            (if mime.is_empty() { DEFAULT_MIME } else { mime }, data)
        },
        None => (DEFAULT_MIME, encoded),
    };

    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(ClassifyError::invalid("image is empty"));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact.as_bytes())
        .map_err(|_| ClassifyError::invalid("image is not valid base64"))?;

    validate_image(ImagePayload::new(bytes, normalize_mime(mime_type)))
}

/// Check an already-decoded image.
pub fn validate_image(image: ImagePayload) -> Result<ImagePayload, ClassifyError> {
    if image.bytes.is_empty() {
        return Err(ClassifyError::invalid("image is empty"));
    }
    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(ClassifyError::invalid("image is too large"));
    }
    if !SUPPORTED_IMAGE_TYPES.contains(&image.mime_type.as_str()) {
        return Err(ClassifyError::invalid(format!(
            "unsupported image type {}",
            image.mime_type
        )));
    }
    Ok(image)
}

fn normalize_mime(mime: &str) -> String {
    match mime.to_ascii_lowercase().as_str() {
        "image/jpg" | "image/pjpeg" => DEFAULT_MIME.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    #[test]
    fn test_data_url_mime_is_used() {
        let image = decode_image(&format!("data:image/png;base64,{PNG_B64}")).expect("decode");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(&image.bytes[1..4], b"PNG");
    }

    #[test]
    fn test_raw_base64_defaults_to_jpeg() {
        let image = decode_image(PNG_B64).expect("decode");
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn test_jpg_alias_and_line_breaks() {
        let wrapped = format!("data:IMAGE/JPG;base64,{}\n{}", &PNG_B64[..20], &PNG_B64[20..]);
        assert_eq!(decode_image(&wrapped).expect("decode").mime_type, "image/jpeg");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(decode_image("").is_err());
        assert!(decode_image("data:image/png;base64,").is_err());
        assert!(decode_image("not base64 at all!").is_err());
        assert!(decode_image(&format!("data:image/png,{PNG_B64}")).is_err());
        assert!(decode_image(&format!("data:image/gif;base64,{PNG_B64}")).is_err());
    }

    #[test]
    fn test_oversized_image_rejected() {
        let image = ImagePayload::new(vec![0; MAX_IMAGE_BYTES + 1], "image/png");
        assert!(validate_image(image).is_err());
    }
}
