use thiserror::Error as DError;

#[derive(Debug, Clone, DError)]
pub enum ErrorKind {
    #[error("Rating({rating}) was stored but movie({movie}) was not updated and the rating couldn't be removed: {cause}")]
    PartialRatingWrite {
        rating: String,
        movie: String,
        cause: String,
    },
}
