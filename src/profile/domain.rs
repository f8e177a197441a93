//! Perfiles de planta.
//!
//! Mapa externo de perfiles por planta con los rangos objetivo de cada
//! métrica. El núcleo no es dueño de este archivo: se carga una sola vez al
//! arranque y se usa de solo lectura para parametrizar los límites de
//! recorte de los medidores.


use std::collections::HashMap;
use std::path::Path;
use serde::{Serialize, Deserialize};
use tracing::{info, warn};


/// Rangos objetivo de una planta. Por ahora el único límite que consumen los
/// medidores es el rango de temperatura del arco.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantProfile {
    pub name: String,
    pub temp_min: f64,
    pub temp_max: f64,
}

impl Default for PlantProfile {
    fn default() -> Self {
        Self {
            name: "Lettuce".to_string(),
            temp_min: 20.0,
            temp_max: 40.0,
        }
    }
}


/// Tabla de perfiles cargada del archivo JSON (`nombre → perfil`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileTable {
    profiles: HashMap<String, PlantProfile>,
}

impl ProfileTable {
    /// Carga la tabla desde disco. Si el archivo no existe o no parsea, se
    /// sigue con la tabla vacía: los medidores usan el perfil por defecto.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<HashMap<String, PlantProfile>>(&text) {
                Ok(profiles) => {
                    info!("Info: {} perfiles de planta cargados de {}", profiles.len(), path.display());
                    Self { profiles }
                }
                Err(e) => {
                    warn!("Warning: archivo de perfiles ilegible ({e}), usando valores por defecto");
                    Self::default()
                }
            },
            Err(_) => {
                warn!("Warning: sin archivo de perfiles en {}, usando valores por defecto", path.display());
                Self::default()
            }
        }
    }

    pub fn get(&self, name: &str) -> PlantProfile {
        self.profiles.get(name).cloned().unwrap_or_default()
    }
}
