//! Turns a partially filled field map into a rendered device configuration.
//!
//! Each [`CommandKind`] has a fixed derivation pipeline: validate the operator
//! addresses, derive masks and neighbours, then derive tunnel endpoints where
//! the device needs them. The completed map is rendered into the kind's
//! template and the artifact is named `{NUM_PA}-{IDENTIFICACAO}.{ext}`.

pub mod bundle;
pub mod pipeline;

pub use bundle::render_bundle;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::addressing::{self, MaskRule};
use crate::error::GenError;
use crate::models::{field, FieldMap, RenderedArtifact};
use crate::render::{self, PlaceholderStyle};
use crate::templates::TemplateSource;

use pipeline::{MaskFallback, MaskTargets};

/// Device family / output flavour of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// MikroTik RouterOS script
    Mkt,
    /// Cisco IOS configuration
    Cisco,
    /// Hand-off message for the operations team
    Mensagem,
    /// Wiki page body for the site
    Wiki,
    /// FortiGate configuration
    Fortigate,
}

impl CommandKind {
    pub const ALL: [CommandKind; 5] = [
        CommandKind::Mkt,
        CommandKind::Cisco,
        CommandKind::Mensagem,
        CommandKind::Wiki,
        CommandKind::Fortigate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mkt => "mkt",
            Self::Cisco => "cisco",
            Self::Mensagem => "mensagem",
            Self::Wiki => "wiki",
            Self::Fortigate => "fortigate",
        }
    }

    pub fn style(self) -> PlaceholderStyle {
        match self {
            Self::Fortigate => PlaceholderStyle::DoubleBrace,
            _ => PlaceholderStyle::SingleBrace,
        }
    }

    /// Template used when the caller names none.
    pub fn default_template(self, fields: &FieldMap) -> Option<&'static str> {
        match self {
            Self::Mkt => Some("mktModelo.txt"),
            Self::Cisco => Some("ciscoModelo.txt"),
            Self::Mensagem => Some("mensagemInternet.txt"),
            Self::Wiki => None,
            Self::Fortigate => {
                let vrf = fields.present(field::VRF).unwrap_or("internet").to_lowercase();
                match vrf.as_str() {
                    "internet" => Some("fortigateInternet.conf"),
                    "mpls" => Some("fortigateMpls.conf"),
                    "mpls/24" => Some("fortigateMpls24.conf"),
                    _ => None,
                }
            }
        }
    }

    /// Run this kind's derivation pipeline over `fields`.
    pub fn derive(self, fields: &mut FieldMap) -> Result<(), GenError> {
        match self {
            Self::Mkt | Self::Mensagem | Self::Wiki => {
                derive_site_addresses(fields)?;
                pipeline::derive_paired_by_index(fields, field::IP_UNIDADE, field::TUNNEL_PREFIX)?;
                pipeline::derive_paired_fixed_host1(fields, field::IP_UNIDADE, field::TUNNEL_PREFIX)
            }
            Self::Cisco => derive_site_addresses(fields),
            Self::Fortigate => derive_firewall_addresses(fields),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| GenError::UnknownCommand(s.to_string()))
    }
}

/// Output file extension for a command kind name; `txt` for anything unknown.
pub fn extension_for(kind: &str) -> &'static str {
    match kind {
        "mkt" => "rsc",
        "cisco" => "crs",
        "mensagem" => "txt",
        "fortigate" => "conf",
        _ => "txt",
    }
}

/// `{NUM_PA}-{IDENTIFICACAO}.{ext}`, with placeholders for missing fields.
pub fn output_filename(kind: &str, fields: &FieldMap) -> String {
    format!(
        "{}-{}.{}",
        fields.get_or(field::NUM_PA, "sem_pa"),
        fields.get_or(field::IDENTIFICACAO, "sem_id"),
        extension_for(kind)
    )
}

/// Router pipeline shared by every site kind: the LAN address must be bare,
/// the public address must carry its prefix.
fn derive_site_addresses(fields: &mut FieldMap) -> Result<(), GenError> {
    addressing::validate(fields, field::IP_UNIDADE, MaskRule::Forbidden)?;
    addressing::validate(fields, field::IP_VALIDO, MaskRule::Required)?;

    pipeline::normalize_with_mask(
        fields,
        field::IP_VALIDO,
        MaskTargets {
            mask_field: field::MASCARA_EXTENSO,
            barred_field: field::IP_VALIDO_BARRADO,
        },
        MaskFallback::default(),
        true,
    );
    pipeline::derive_neighbors(fields, field::IP_VALIDO_BARRADO, field::IP_VALIDO_BARRADO, true);
    pipeline::derive_neighbors(fields, field::IP_UNIDADE, field::IP_UNIDADE, false);
    pipeline::derive_neighbors(fields, field::IP_VALIDO, field::IP_VALIDO, false);
    Ok(())
}

/// Firewall pipeline: the site address lives in `IP_PRIVADO` on MPLS links
/// and in `IP_PUBLICO` otherwise. Both addresses are optional.
fn derive_firewall_addresses(fields: &mut FieldMap) -> Result<(), GenError> {
    let vrf = fields.present(field::VRF).unwrap_or("internet").to_string();
    let site_field = if vrf.to_lowercase().starts_with("mpls") {
        field::IP_PRIVADO
    } else {
        field::IP_PUBLICO
    };

    addressing::validate_if_present(fields, field::WAN_IP)?;
    addressing::validate_if_present(fields, site_field)?;

    // the firewall config shows the VRF upper-cased
    fields.set_derived(field::VRF, vrf.to_uppercase());

    pipeline::derive_neighbors(fields, field::WAN_IP, field::WAN_IP, false);
    pipeline::derive_neighbors(fields, site_field, site_field, false);
    Ok(())
}

/// Renders configurations from templates held by a [`TemplateSource`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder<T> {
    templates: T,
}

impl<T: TemplateSource> ConfigBuilder<T> {
    pub fn new(templates: T) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &T {
        &self.templates
    }

    /// Derive, pick the template, render and name the artifact.
    ///
    /// The template is `template` if given, else the `TEMPLATE` field, else the
    /// kind's default. Any failure aborts the whole build.
    pub fn build(
        &self,
        kind: CommandKind,
        template: Option<&str>,
        mut fields: FieldMap,
    ) -> Result<RenderedArtifact, GenError> {
        kind.derive(&mut fields)?;

        let name = template
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| fields.present(field::TEMPLATE))
            .or_else(|| kind.default_template(&fields))
            .map(str::to_string)
            .ok_or_else(|| GenError::TemplateNotFound(format!("(no template for {})", kind)))?;

        let text = self.templates.load(&name)?;
        let preview = render::render(&text, &fields, kind.style());
        let filename = output_filename(kind.as_str(), &fields);

        tracing::info!("Rendered {} config {} from {}", kind, filename, name);

        Ok(RenderedArtifact {
            preview,
            filename,
            unidade: fields.get_or(field::NOME_PA, "").to_string(),
            loja: fields.get_or(field::NUM_PA, "").to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn store() -> HashMap<String, String> {
        let mut templates = HashMap::new();
        templates.insert(
            "mktModelo.txt".to_string(),
            "/system identity set name={NUM_PA}-{IDENTIFICACAO}\n\
             /ip address add address={IP_UNIDADE}/24 interface=bridge\n\
             /ip address add address={IP_VALIDO_BARRADO} interface=ether1\n\
             /ip route add gateway={IP_VALIDO_M1}\n\
             /interface l2tp-client add connect-to={IP_GARY} user={GARY_USER}\n\
             /interface l2tp-client add connect-to={IP_PLANKTON} user={PLANKTON_USER}\n\
             :put \"{IP_GARY_FINAL1} {IP_PLANKTON_FINAL1}\""
                .to_string(),
        );
        templates.insert(
            "ciscoModelo.txt".to_string(),
            "hostname {NUM_PA}-{IDENTIFICACAO}\n\
             ip address {IP_VALIDO} {MASCARA_EXTENSO}\n\
             ip route 0.0.0.0 0.0.0.0 {IP_VALIDO_P1}\n\
             ! tunnel {IP_GARY}"
                .to_string(),
        );
        templates.insert(
            "mensagemInternet.txt".to_string(),
            "Unidade {NOME_PA}: {IP_VALIDO_BARRADO} via {PARCEIRO}".to_string(),
        );
        templates.insert(
            "fortigateInternet.conf".to_string(),
            "set vrf {{VRF}}\nset ip {{WAN_IP}} gw {{WAN_IP_M1}}\nset pub {{IP_PUBLICO_P1}}\n{{UNUSED}}".to_string(),
        );
        templates.insert(
            "fortigateMpls.conf".to_string(),
            "set vrf {{VRF}}\nset lan {{IP_PRIVADO}} peer {{IP_PRIVADO_P1}}".to_string(),
        );
        templates
    }

    fn site_fields() -> FieldMap {
        [
            ("NUM_PA", "12"),
            ("NOME_PA", "Centro"),
            ("IDENTIFICACAO", "LOJA-CENTRO"),
            ("PARCEIRO", "ACME"),
            ("IP_UNIDADE", "10.20.30.105"),
            ("IP_VALIDO", "200.1.2.3/29"),
            ("GARY_USER", "gary12"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_command_kind_parse() {
        assert_eq!("mkt".parse::<CommandKind>(), Ok(CommandKind::Mkt));
        assert_eq!(" Cisco ".parse::<CommandKind>(), Ok(CommandKind::Cisco));
        assert_eq!("fortigate".parse::<CommandKind>(), Ok(CommandKind::Fortigate));
        assert_eq!(
            "juniper".parse::<CommandKind>(),
            Err(GenError::UnknownCommand("juniper".into()))
        );
    }

    #[test]
    fn test_extension_table() {
        assert_eq!(extension_for("mkt"), "rsc");
        assert_eq!(extension_for("cisco"), "crs");
        assert_eq!(extension_for("mensagem"), "txt");
        assert_eq!(extension_for("fortigate"), "conf");
        assert_eq!(extension_for("wiki"), "txt");
        assert_eq!(extension_for("whatever"), "txt");
    }

    #[test]
    fn test_output_filename_defaults() {
        assert_eq!(output_filename("mkt", &FieldMap::new()), "sem_pa-sem_id.rsc");
        assert_eq!(output_filename("cisco", &site_fields()), "12-LOJA-CENTRO.crs");
    }

    #[test]
    fn test_build_mkt() {
        let builder = ConfigBuilder::new(store());
        let artifact = builder.build(CommandKind::Mkt, None, site_fields()).unwrap();

        assert_eq!(artifact.filename, "12-LOJA-CENTRO.rsc");
        assert_eq!(artifact.unidade, "Centro");
        assert_eq!(artifact.loja, "12");
        assert_eq!(
            artifact.preview,
            "/system identity set name=12-LOJA-CENTRO\n\
             /ip address add address=10.20.30.105/24 interface=bridge\n\
             /ip address add address=200.1.2.3/29 interface=ether1\n\
             /ip route add gateway=200.1.2.2\n\
             /interface l2tp-client add connect-to=10.20.30.4 user=gary12\n\
             /interface l2tp-client add connect-to=10.20.31.4 user={PLANKTON_USER}\n\
             :put \"10.20.30.1 10.20.31.1\""
        );
    }

    #[test]
    fn test_build_cisco_has_no_tunnel_endpoints() {
        let builder = ConfigBuilder::new(store());
        let mut fields = site_fields();
        // off-grid LAN address would be fatal for the router pipeline
        fields.insert("IP_UNIDADE", "10.20.30.106");
        let artifact = builder.build(CommandKind::Cisco, None, fields).unwrap();
        assert_eq!(
            artifact.preview,
            "hostname 12-LOJA-CENTRO\n\
             ip address 200.1.2.3 255.255.255.248\n\
             ip route 0.0.0.0 0.0.0.0 200.1.2.4\n\
             ! tunnel {IP_GARY}"
        );
    }

    #[test]
    fn test_build_mensagem() {
        let builder = ConfigBuilder::new(store());
        let artifact = builder.build(CommandKind::Mensagem, None, site_fields()).unwrap();
        assert_eq!(artifact.preview, "Unidade Centro: 200.1.2.3/29 via ACME");
        assert_eq!(artifact.filename, "12-LOJA-CENTRO.txt");
    }

    #[test]
    fn test_build_wiki_requires_a_template() {
        let builder = ConfigBuilder::new(store());
        let err = builder.build(CommandKind::Wiki, None, site_fields()).unwrap_err();
        assert!(matches!(err, GenError::TemplateNotFound(_)));

        let mut fields = site_fields();
        fields.insert("TEMPLATE", "mensagemInternet.txt");
        let artifact = builder.build(CommandKind::Wiki, None, fields).unwrap();
        assert_eq!(artifact.preview, "Unidade Centro: 200.1.2.3/29 via ACME");
    }

    #[test]
    fn test_build_explicit_template_wins_and_path_is_stripped() {
        let builder = ConfigBuilder::new(store());
        let mut fields = site_fields();
        fields.insert("TEMPLATE", "ciscoModelo.txt");
        let artifact = builder
            .build(CommandKind::Mkt, Some("../../mensagemInternet.txt"), fields)
            .unwrap();
        assert_eq!(artifact.preview, "Unidade Centro: 200.1.2.3/29 via ACME");
        assert_eq!(artifact.filename, "12-LOJA-CENTRO.rsc");
    }

    #[test]
    fn test_build_unknown_template() {
        let builder = ConfigBuilder::new(store());
        let err = builder
            .build(CommandKind::Mkt, Some("nao-existe.txt"), site_fields())
            .unwrap_err();
        assert_eq!(err, GenError::TemplateNotFound("nao-existe.txt".into()));
    }

    #[test]
    fn test_build_propagates_address_errors() {
        let builder = ConfigBuilder::new(store());

        let mut fields = site_fields();
        fields.insert("IP_UNIDADE", "10.20.30.105/24");
        assert_eq!(
            builder.build(CommandKind::Mkt, None, fields).unwrap_err(),
            GenError::UnexpectedMask { field: "IP_UNIDADE".into() }
        );

        let mut fields = site_fields();
        fields.insert("IP_VALIDO", "200.1.2.3");
        assert_eq!(
            builder.build(CommandKind::Cisco, None, fields).unwrap_err(),
            GenError::MissingMask { field: "IP_VALIDO".into() }
        );

        let mut fields = site_fields();
        fields.insert("IP_UNIDADE", "");
        assert!(matches!(
            builder.build(CommandKind::Mkt, None, fields).unwrap_err(),
            GenError::InvalidAddress { .. }
        ));

        let mut fields = site_fields();
        fields.insert("IP_UNIDADE", "10.20.30.254");
        assert!(matches!(
            builder.build(CommandKind::Mkt, None, fields).unwrap_err(),
            GenError::OutOfRange(_)
        ));
    }

    #[test]
    fn test_build_fortigate_internet() {
        let builder = ConfigBuilder::new(store());
        let fields: FieldMap = [
            ("NUM_PA", "7"),
            ("IDENTIFICACAO", "FW"),
            ("VRF", "internet"),
            ("WAN_IP", "100.64.0.10"),
            ("IP_PUBLICO", "200.9.9.9"),
        ]
        .into_iter()
        .collect();
        let artifact = builder.build(CommandKind::Fortigate, None, fields).unwrap();
        assert_eq!(
            artifact.preview,
            "set vrf INTERNET\nset ip 100.64.0.10 gw 100.64.0.9\nset pub 200.9.9.10\n{{UNUSED}}"
        );
        assert_eq!(artifact.filename, "7-FW.conf");
    }

    #[test]
    fn test_build_fortigate_mpls_uses_private_address() {
        let builder = ConfigBuilder::new(store());
        let fields: FieldMap = [("VRF", "MPLS"), ("IP_PRIVADO", "172.16.5.1")]
            .into_iter()
            .collect();
        let artifact = builder.build(CommandKind::Fortigate, None, fields).unwrap();
        assert_eq!(artifact.preview, "set vrf MPLS\nset lan 172.16.5.1 peer 172.16.5.2");
    }

    #[test]
    fn test_build_fortigate_rejects_bad_address_and_unknown_vrf() {
        let builder = ConfigBuilder::new(store());
        let fields: FieldMap = [("WAN_IP", "300.1.1.1")].into_iter().collect();
        assert!(matches!(
            builder.build(CommandKind::Fortigate, None, fields).unwrap_err(),
            GenError::InvalidAddress { .. }
        ));

        let fields: FieldMap = [("VRF", "satelite")].into_iter().collect();
        assert!(matches!(
            builder.build(CommandKind::Fortigate, None, fields).unwrap_err(),
            GenError::TemplateNotFound(_)
        ));
    }
}
