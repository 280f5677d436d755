mod configs;
mod fields;
mod inventory;
mod templates;

pub use configs::*;
pub use fields::FieldMap;
pub use inventory::*;
pub use templates::*;

/// Canonical field names read or written by the build pipelines
pub mod field {
    pub const NUM_PA: &str = "NUM_PA";
    pub const NOME_PA: &str = "NOME_PA";
    pub const IDENTIFICACAO: &str = "IDENTIFICACAO";
    pub const TEMPLATE: &str = "TEMPLATE";

    pub const IP_UNIDADE: &str = "IP_UNIDADE";
    pub const IP_VALIDO: &str = "IP_VALIDO";
    pub const MASCARA_EXTENSO: &str = "MASCARA_EXTENSO";
    pub const IP_VALIDO_BARRADO: &str = "IP_VALIDO_BARRADO";

    /// Prefix of the tunnel endpoint fields (`IP_GARY`, `IP_PLANKTON`, `IP_N`, ...)
    pub const TUNNEL_PREFIX: &str = "IP";

    pub const VRF: &str = "VRF";
    pub const WAN_IP: &str = "WAN_IP";
    pub const IP_PUBLICO: &str = "IP_PUBLICO";
    pub const IP_PRIVADO: &str = "IP_PRIVADO";
}
