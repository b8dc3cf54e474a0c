use tracing::{debug, info};

use crate::data::file::{
    DeleteFileVersionRequest, GetFileInfoRequest, GetUploadUrlRequest, ListFileNamesRequest,
};
use crate::data::{
    Authorization, DeletedFileVersion, FileInfo, FileNameListing, ListFilesOptions, UploadTicket,
};
use crate::effects::api;
use crate::effects::http::HttpClient;
use crate::error::Result;

pub(crate) async fn get_upload_url<C: HttpClient>(
    http: &C,
    auth: &Authorization,
    bucket_id: &str,
) -> Result<UploadTicket> {
    let ticket: UploadTicket =
        api::call(http, auth, "b2_get_upload_url", &GetUploadUrlRequest { bucket_id }).await?;
    debug!(bucket_id, upload_url = %ticket.upload_url, "obtained upload URL");
    Ok(ticket)
}

pub(crate) async fn list_file_names<C: HttpClient>(
    http: &C,
    auth: &Authorization,
    bucket_id: &str,
    options: &ListFilesOptions,
) -> Result<FileNameListing> {
    let request = ListFileNamesRequest::new(bucket_id, options);
    api::call(http, auth, "b2_list_file_names", &request).await
}

pub(crate) async fn get_file_info<C: HttpClient>(
    http: &C,
    auth: &Authorization,
    file_id: &str,
) -> Result<FileInfo> {
    api::call(http, auth, "b2_get_file_info", &GetFileInfoRequest { file_id }).await
}

pub(crate) async fn delete_file_version<C: HttpClient>(
    http: &C,
    auth: &Authorization,
    file_name: &str,
    file_id: &str,
) -> Result<DeletedFileVersion> {
    let request = DeleteFileVersionRequest { file_name, file_id };
    let deleted: DeletedFileVersion =
        api::call(http, auth, "b2_delete_file_version", &request).await?;
    info!(file_name, file_id, "deleted file version");
    Ok(deleted)
}
