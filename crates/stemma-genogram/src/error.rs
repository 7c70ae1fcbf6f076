use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenogramError {
    #[error(transparent)]
    Layout(#[from] stemma::LayoutError),

    #[error("duplicate person id: {0}")]
    DuplicatePerson(String),

    #[error("unknown person id: {0}")]
    UnknownPerson(String),
}
