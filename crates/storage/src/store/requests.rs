#![forbid(unsafe_code)]

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateItemRequest {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateItemRequest {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateOwnerRequest {
    pub username: String,
    pub email: String,
}
