use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::db::MongoConfig;

#[derive(Parser)]
#[command(name = "my-huerto")]
#[command(about = "Una CLI para llevar el seguimiento de mis huertos, siembras y cosechas")]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct Config {
    /// URI de conexión a MongoDB
    #[arg(long, global = true, env = "MONGO_URI", default_value = "mongodb://localhost:27017")]
    pub mongo_uri: String,
    /// Nombre de la base de datos
    #[arg(long, global = true, env = "HUERTO_DB", default_value = "huerto")]
    pub database: String,
    /// Tiempo máximo para encontrar el servidor, en segundos
    #[arg(long, global = true, env = "HUERTO_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
    /// Usuario que ejecuta el comando (por defecto $USER)
    #[arg(long, global = true, env = "HUERTO_USER")]
    pub user: Option<String>,
    /// Usar un almacén en memoria con plantas de ejemplo en lugar de MongoDB
    #[arg(long, global = true)]
    pub in_memory: bool,
    /// Mostrar logs de depuración
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Config {
    pub fn mongo(&self) -> MongoConfig {
        MongoConfig {
            uri: self.mongo_uri.clone(),
            database: self.database.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn acting_user(&self) -> String {
        self.user
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| "local".to_string())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Biblioteca de plantas
    Plant {
        #[command(subcommand)]
        action: PlantCommand,
    },
    /// Huertos y colaboradores
    Garden {
        #[command(subcommand)]
        action: GardenCommand,
    },
    /// Ubicaciones dentro de un huerto
    Location {
        #[command(subcommand)]
        action: LocationCommand,
    },
    /// Siembras y cosechas
    Planting {
        #[command(subcommand)]
        action: PlantingCommand,
    },
    /// Resumen del huerto
    Stats {
        /// ID del huerto
        #[arg(long)]
        garden: String,
        /// Fecha de referencia (AAAA-MM-DD), por defecto hoy
        #[arg(long)]
        date: Option<String>,
    },
    /// Calendario del mes y próximos eventos
    Timeline {
        /// ID del huerto
        #[arg(long)]
        garden: String,
        /// Mes a mostrar (AAAA-MM), por defecto el actual
        #[arg(long)]
        month: Option<String>,
        /// Fecha de referencia (AAAA-MM-DD), por defecto hoy
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlantCommand {
    /// Ver plantas (con búsqueda por nombre/descripción, categoría o temporada)
    List {
        /// Buscar en nombre o descripción
        #[arg(long = "search")]
        search: Option<String>,
        /// Categoría: vegetable, herb o fruit
        #[arg(long)]
        category: Option<String>,
        /// Temporada (coincidencia parcial)
        #[arg(long)]
        season: Option<String>,
    },
    /// Ver una planta
    View {
        #[arg(long)]
        id: String,
    },
    /// Agregar nueva planta
    Add(AddPlantArgs),
    /// Actualizar planta existente
    Update(UpdatePlantArgs),
    /// Remover planta
    Remove {
        #[arg(long)]
        id: String,
    },
    /// Cargar la biblioteca de plantas de ejemplo
    Seed,
}

#[derive(Args, Debug)]
pub struct AddPlantArgs {
    /// Nombre de la planta
    #[arg(short = 'n', long = "name")]
    pub name: String,
    /// Categoría: vegetable, herb o fruit
    #[arg(short = 'c', long = "category")]
    pub category: String,
    /// Días hasta brotar
    #[arg(long)]
    pub days_to_sprout: u32,
    /// Días hasta cosechar
    #[arg(long)]
    pub days_to_harvest: u32,
    /// Temporada de siembra
    #[arg(short = 's', long = "season")]
    pub season: String,
    #[arg(long)]
    pub description: Option<String>,
    /// URL de imagen
    #[arg(long)]
    pub image_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdatePlantArgs {
    /// ID de la planta a actualizar (ObjectId)
    #[arg(long)]
    pub id: String,
    #[arg(short, long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub category: Option<String>,
    #[arg(long)]
    pub days_to_sprout: Option<u32>,
    #[arg(long)]
    pub days_to_harvest: Option<u32>,
    #[arg(short, long)]
    pub season: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum GardenCommand {
    /// Ver mis huertos y los compartidos conmigo
    List,
    /// Ver un huerto con sus colaboradores
    View {
        #[arg(long)]
        id: String,
    },
    /// Crear un huerto
    Create {
        #[arg(short = 'n', long = "name")]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Renombrar o describir un huerto
    Update {
        #[arg(long)]
        id: String,
        #[arg(short = 'n', long = "name")]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remover un huerto con todas sus ubicaciones y siembras
    Remove {
        #[arg(long)]
        id: String,
    },
    /// Compartir el huerto con otro usuario
    Share {
        #[arg(long)]
        id: String,
        /// Usuario colaborador
        #[arg(long = "with")]
        with: String,
        /// Rol: editor o viewer
        #[arg(long, default_value = "viewer")]
        role: String,
    },
    /// Dejar de compartir el huerto con un usuario
    Unshare {
        #[arg(long)]
        id: String,
        #[arg(long = "with")]
        with: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum LocationCommand {
    /// Ver las ubicaciones de un huerto
    List {
        #[arg(long)]
        garden: String,
    },
    /// Agregar ubicación
    Add {
        #[arg(long)]
        garden: String,
        #[arg(short = 'n', long = "name")]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Actualizar ubicación
    Update {
        #[arg(long)]
        id: String,
        #[arg(short = 'n', long = "name")]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remover ubicación
    Remove {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlantingCommand {
    /// Ver las siembras de un huerto
    List {
        #[arg(long)]
        garden: String,
        /// Buscar por nombre de planta o ubicación
        #[arg(long = "search")]
        search: Option<String>,
        /// Filtrar por estado: sprouting, growing, ready o harvested
        #[arg(long)]
        status: Option<String>,
        /// Fecha de referencia (AAAA-MM-DD), por defecto hoy
        #[arg(long)]
        date: Option<String>,
    },
    /// Ver una siembra
    View {
        #[arg(long)]
        id: String,
    },
    /// Registrar una siembra
    Add(AddPlantingArgs),
    /// Actualizar una siembra
    Update(UpdatePlantingArgs),
    /// Registrar la cosecha de una siembra
    Harvest(HarvestArgs),
    /// Remover una siembra
    Remove {
        #[arg(long)]
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct AddPlantingArgs {
    #[arg(long)]
    pub garden: String,
    /// ID de la planta sembrada
    #[arg(long)]
    pub plant: String,
    /// Dónde se sembró
    #[arg(short = 'l', long = "location")]
    pub location: String,
    /// Fecha de siembra (AAAA-MM-DD), por defecto hoy
    #[arg(long)]
    pub date: Option<String>,
    #[arg(short = 'q', long, default_value_t = 1)]
    pub quantity: u32,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdatePlantingArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub plant: Option<String>,
    #[arg(short = 'l', long = "location")]
    pub location: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(short = 'q', long)]
    pub quantity: Option<u32>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct HarvestArgs {
    #[arg(long)]
    pub id: String,
    /// Fecha de cosecha (AAAA-MM-DD), por defecto hoy
    #[arg(long)]
    pub date: Option<String>,
    /// Cantidad cosechada, por defecto la cantidad sembrada
    #[arg(short = 'q', long)]
    pub quantity: Option<u32>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_nested_planting_command() {
        let cli = Cli::try_parse_from([
            "my-huerto",
            "--in-memory",
            "planting",
            "add",
            "--garden",
            "65f000000000000000000001",
            "--plant",
            "65f000000000000000000002",
            "-l",
            "Bancal",
            "--date",
            "2024-01-01",
        ])
        .unwrap();

        assert!(cli.config.in_memory);
        match cli.command {
            Commands::Planting {
                action: PlantingCommand::Add(args),
            } => {
                assert_eq!(args.location, "Bancal");
                assert_eq!(args.quantity, 1);
                assert_eq!(args.date.as_deref(), Some("2024-01-01"));
            }
            _ => panic!("se esperaba planting add"),
        }
    }

    #[test]
    fn parses_plant_list_filters() {
        let cli = Cli::try_parse_from([
            "my-huerto",
            "plant",
            "list",
            "--search",
            "tomate",
            "--category",
            "herb",
            "--season",
            "verano",
        ])
        .unwrap();

        match cli.command {
            Commands::Plant {
                action:
                    PlantCommand::List {
                        search,
                        category,
                        season,
                    },
            } => {
                assert_eq!(search.as_deref(), Some("tomate"));
                assert_eq!(category.as_deref(), Some("herb"));
                assert_eq!(season.as_deref(), Some("verano"));
            }
            _ => panic!("se esperaba plant list"),
        }
    }
}
