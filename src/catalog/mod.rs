//! Responder keyword catalogs.
//!
//! A catalog turns a question into a canned answer: normalize, scan the
//! ordered rules, fall back when nothing matches.

pub mod defaults;

use crate::config::schema::{CatalogConfig, ServiceKind};
use crate::matching::{KeywordTable, Normalization};

/// Result of answering one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer<'a> {
    /// Question after normalization.
    pub normalized: String,
    /// Response text.
    pub text: &'a str,
    /// False when the fallback was used.
    pub matched: bool,
}

/// Compiled keyword catalog of one responder.
#[derive(Debug)]
pub struct Catalog {
    table: KeywordTable<String>,
    fallback: String,
}

impl Catalog {
    /// Compile a catalog definition.
    pub fn from_config(config: CatalogConfig) -> Self {
        Self {
            table: KeywordTable::compile(config.normalization, config.rules),
            fallback: config.fallback,
        }
    }

    /// Built-in catalog of `kind`.
    pub fn builtin(kind: ServiceKind) -> Self {
        Self::from_config(defaults::catalog(kind))
    }

    /// Catalog for `kind`, preferring an explicit override.
    pub fn resolve(kind: ServiceKind, override_config: Option<&CatalogConfig>) -> Self {
        match override_config {
            Some(config) => Self::from_config(config.clone()),
            None => Self::builtin(kind),
        }
    }

    pub fn normalization(&self) -> Normalization {
        self.table.normalization()
    }

    /// Answer a question.
    pub fn answer(&self, pregunta: &str) -> Answer<'_> {
        let normalized = self.table.normalize(pregunta);
        match self.table.lookup_normalized(&normalized) {
            Some(text) => Answer {
                normalized,
                text,
                matched: true,
            },
            None => Answer {
                normalized,
                text: &self.fallback,
                matched: false,
            },
        }
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(kind: ServiceKind, pregunta: &str) -> String {
        Catalog::builtin(kind).answer(pregunta).text.to_string()
    }

    #[test]
    fn test_consultas_keywords() {
        let cases = [
            ("¿Cuál fue mi último movimiento?", "35€ en Amazon"),
            ("¿Qué he comprado últimamente?", "35€ en Amazon"),
            ("Dime mi SALDO", "1.275,45€"),
            ("Quiero el extracto", "18 movimientos"),
            ("¿Cuánto pagué de luz?", "44,90€"),
            ("¿Cuál es mi IBAN?", "ES6600190020961234567890"),
            ("¿Dónde hay un cajero?", "Dónde estamos"),
            ("¿Tengo alguna entrada de dinero?", "1.200€"),
            ("¿Cuál es el límite de mi tarjeta?", "2.000€ mensuales"),
            ("¿A cuánto está la divisa?", "EUR/USD"),
            ("¿Cuándo fue mi último acceso?", "17:42"),
        ];
        for (pregunta, fragment) in cases {
            let text = ask(ServiceKind::Consultas, pregunta);
            assert!(text.contains(fragment), "{pregunta:?} → {text:?}");
        }
    }

    #[test]
    fn test_consultas_priority_order() {
        // "movimiento" is checked before "extracto"
        let text = ask(ServiceKind::Consultas, "movimientos del extracto");
        assert!(text.contains("Amazon"));
    }

    #[test]
    fn test_cuentas_keywords_ignore_accents() {
        let cases = [
            ("Quiero abrir cuenta", "abierta correctamente"),
            ("Quiero ABRIR una nueva Cuenta", "abierta correctamente"),
            ("¿Qué tipos de cuentas ofrecéis?", "cuentas de ahorro"),
            ("¿Qué condiciones hay?", "mayor de edad"),
            ("¿Cobráis comisión?", "no tienen comisiones"),
            ("¿Puedo convertir mi cuenta?", "cuenta nómina"),
            ("¿Cuál es el plazo?", "24-48h"),
        ];
        for (pregunta, fragment) in cases {
            let text = ask(ServiceKind::Cuentas, pregunta);
            assert!(text.contains(fragment), "{pregunta:?} → {text:?}");
        }
    }

    #[test]
    fn test_identidad_keywords() {
        let cases = [
            ("¿Puedes verificar mi identidad con mi DNI?", "documento ha sido validado"),
            ("Te paso el código SMS", "Código verificado"),
            ("Confirma mi email", "correo ha sido confirmado"),
            ("Activa el 2FA", "dos pasos"),
            ("verificar identidad", "Juan Pérez"),
        ];
        for (pregunta, fragment) in cases {
            let text = ask(ServiceKind::Identidad, pregunta);
            assert!(text.contains(fragment), "{pregunta:?} → {text:?}");
        }
    }

    #[test]
    fn test_ia_keywords() {
        let cases = [
            ("¿Qué tipo de interés tiene la hipoteca?", "3,2%"),
            ("Quiero una tarjeta", "solicitar una tarjeta"),
            ("¿Cuánto tarda una transferencia?", "24h hábiles"),
            ("¿Hay comisión?", "10€ trimestrales"),
            ("Horario de oficina", "8:30 a 14:00"),
            ("Necesito un certificado", "titularidad"),
            ("Quiero un préstamo", "5,5% TIN"),
            ("Busco inversión", "perfil de riesgo"),
        ];
        for (pregunta, fragment) in cases {
            let text = ask(ServiceKind::Ia, pregunta);
            assert!(text.contains(fragment), "{pregunta:?} → {text:?}");
        }
    }

    #[test]
    fn test_unknown_question_uses_fallback() {
        for kind in ServiceKind::ALL {
            let catalog = Catalog::builtin(kind);
            let answer = catalog.answer("¿Qué tiempo hace en Marte?");
            assert!(!answer.matched, "{kind} matched unexpectedly");
            assert_eq!(answer.text, catalog.fallback());
        }
    }

    #[test]
    fn test_override_replaces_builtin() {
        let config = CatalogConfig {
            normalization: Normalization::Lowercase,
            rules: vec![crate::matching::KeywordRule::any(&["hola"], "adiós".to_string())],
            fallback: "?".into(),
        };
        let catalog = Catalog::resolve(ServiceKind::Ia, Some(&config));
        assert_eq!(catalog.answer("HOLA").text, "adiós");
        assert_eq!(catalog.answer("hipoteca").text, "?");
    }
}
