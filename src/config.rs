pub mod poll {
    use tokio::time::Duration;

    /// Comando de lectura de sensores del firmware.
    pub const REQUEST_CMD: &str = "S\n";
    pub const INTERVAL_MS: u64 = 2000;
    /// Espera fija entre la petición y el único intento de lectura.
    pub const GRACE_MS: u64 = 100;
    /// Ventana del intento de lectura sobre el buffer de respuesta.
    pub const READ_WINDOW: Duration = Duration::from_millis(50);
}

pub mod ingest {
    pub const CHANNEL_CAPACITY: usize = 200;
    pub const STATUS_INTERVAL_SECS: u64 = 60;
}

pub mod series {
    pub const CAPACITY: usize = 300;
}

pub mod gauge {
    pub const TEMP_ANIM_MS: i64 = 600;
    pub const STRIP_ANIM_MS: i64 = 400;

    // Factores de presentación de la tira acotada (0-100). Son ajuste visual
    // heredado del panel, no invariantes del sistema.
    pub const CO2_DIVISOR: f64 = 20.0;
    pub const TVOC_DIVISOR: f64 = 10.0;
    pub const LUX_DIVISOR: f64 = 20.0;
    pub const STRIP_MAX: f64 = 100.0;
}

pub mod mqtt {
    use tokio::time::Duration;

    pub const KEEP_ALIVE: Duration = Duration::from_secs(30);
    pub const EVENT_CAPACITY: usize = 20;
    pub const RETRY_WAIT: Duration = Duration::from_secs(5);
}
