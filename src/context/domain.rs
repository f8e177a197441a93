//! Definición del Contexto de Aplicación (Shared State).
//!
//! El `AppContext` agrupa los recursos de solo lectura que deben ser
//! accesibles por múltiples tareas concurrentes: la configuración del
//! sistema y el perfil de planta activo, cargado una sola vez al arranque.


use std::path::Path;
use std::sync::Arc;
use crate::profile::domain::PlantProfile;
use crate::system::domain::System;


#[derive(Clone, Debug)]
pub struct AppContext {
    pub system: Arc<System>,
    pub profile: Arc<PlantProfile>,
}


impl AppContext {
    pub fn new(system: System) -> Self {
        let table = crate::profile::domain::ProfileTable::load(Path::new(&system.profile_path));
        let profile = table.get(&system.plant_profile);
        Self {
            system: Arc::new(system),
            profile: Arc::new(profile),
        }
    }
}
