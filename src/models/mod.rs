// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Profile, NewProfile, ProfileFilter, SortOrder, PartnerRequest, NewPartnerRequest, RequestStatus};
pub use requests::{CreateProfileRequest, ListProfilesQuery, SendPartnerRequestBody, UpdateRequestMessageBody};
pub use responses::{CreateProfileResponse, SendRequestResponse, MessageResponse, HealthResponse, ErrorResponse};
