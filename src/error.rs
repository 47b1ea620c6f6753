use mongodb::bson::oid::ObjectId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("fecha inválida '{input}' (se espera AAAA-MM-DD): {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("mes inválido '{0}' (se espera AAAA-MM)")]
    InvalidMonth(String),

    #[error("ID inválido '{input}': {source}")]
    InvalidId {
        input: String,
        #[source]
        source: mongodb::bson::oid::Error,
    },

    #[error("{entity} con ID {id} no encontrado")]
    NotFound { entity: &'static str, id: ObjectId },

    #[error("datos inválidos: {0}")]
    Validation(String),

    #[error("el usuario '{user}' no tiene permiso para {action} en el huerto {garden}")]
    Forbidden {
        user: String,
        garden: ObjectId,
        action: &'static str,
    },

    #[error("la siembra {0} ya fue cosechada")]
    AlreadyHarvested(ObjectId),

    #[error("la planta {id} está en uso por {plantings} siembra(s)")]
    PlantInUse { id: ObjectId, plantings: usize },

    #[error("error de base de datos: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("error al serializar documento: {0}")]
    Serialize(#[from] mongodb::bson::ser::Error),

    #[error("error al leer documento: {0}")]
    Deserialize(#[from] mongodb::bson::de::Error),
}

impl Error {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: ObjectId) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Parses a hex ObjectId coming from user input.
pub fn parse_id(input: &str) -> Result<ObjectId> {
    ObjectId::parse_str(input.trim()).map_err(|source| Error::InvalidId {
        input: input.to_string(),
        source,
    })
}
