use actix_web::HttpResponse;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};

use super::{FileDownload, HostError, HostSurface};

/// HTTP host: the downloaded file becomes the response body.
#[derive(Debug, Default)]
pub struct AttachmentSurface {
    file: Option<FileDownload>,
}

impl AttachmentSurface {
    pub fn file(&self) -> Option<&FileDownload> {
        self.file.as_ref()
    }

    /// Build the attachment response, or `None` if nothing was downloaded.
    pub fn into_response(self) -> Option<HttpResponse> {
        let file = self.file?;

        let disposition = ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.file_name)],
        };

        Some(
            HttpResponse::Ok()
                .content_type(file.content_type)
                .insert_header(disposition)
                .body(file.bytes),
        )
    }
}

impl HostSurface for AttachmentSurface {
    fn focus(&mut self, selector: &str) -> Result<(), HostError> {
        Err(HostError::ElementNotFound(selector.to_string()))
    }

    fn download(&mut self, file: FileDownload) -> Result<(), HostError> {
        if self.file.is_some() {
            return Err(HostError::DownloadPending);
        }
        self.file = Some(file);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::header;

    fn csv_file() -> FileDownload {
        FileDownload {
            file_name: "scans-01-15-2024.csv".into(),
            content_type: "text/csv",
            bytes: b"Employee ID".to_vec(),
        }
    }

    #[actix_web::test]
    async fn response_carries_file_as_attachment() {
        let mut surface = AttachmentSurface::default();
        surface.download(csv_file()).unwrap();

        let resp = surface.into_response().unwrap();
        let headers = resp.headers();
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/csv");
        assert_eq!(
            headers.get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"scans-01-15-2024.csv\""
        );

        let body = to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(&body[..], b"Employee ID");
    }

    #[test]
    fn second_download_is_rejected() {
        let mut surface = AttachmentSurface::default();
        surface.download(csv_file()).unwrap();
        assert_eq!(surface.download(csv_file()), Err(HostError::DownloadPending));
    }

    #[test]
    fn empty_surface_has_no_response() {
        assert!(AttachmentSurface::default().into_response().is_none());
    }
}
