pub mod convert;
pub mod headers;
pub mod sessions;

pub use convert::{handle_convert, png_response, ConvertQuery, __path_handle_convert};
pub use headers::{read_body, read_json, upload_from_request, HeaderMapExt, FILENAME_HEADER};
pub use sessions::{
    handle_create_session, handle_delete_session, handle_get_session, handle_replace_source,
    handle_session_image, handle_set_orientation, ChangeAccepted, OrientationRequest,
};
pub use sessions::{
    __path_handle_create_session, __path_handle_delete_session, __path_handle_get_session,
    __path_handle_replace_source, __path_handle_session_image, __path_handle_set_orientation,
};
