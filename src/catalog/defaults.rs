//! Built-in keyword data for every service.

use crate::config::schema::{CatalogConfig, DispatchConfig, ServiceKind};
use crate::matching::{KeywordRule, Normalization};

/// Default catalog of a responder.
pub fn catalog(kind: ServiceKind) -> CatalogConfig {
    match kind {
        ServiceKind::Consultas => consultas(),
        ServiceKind::Cuentas => cuentas(),
        ServiceKind::Identidad => identidad(),
        ServiceKind::Ia => ia(),
    }
}

fn answer(keywords: &[&str], response: &str) -> KeywordRule<String> {
    KeywordRule::any(keywords, response.to_string())
}

fn consultas() -> CatalogConfig {
    CatalogConfig {
        normalization: Normalization::Lowercase,
        rules: vec![
            answer(
                &["movimiento", "compra", "comprado", "últimamente"],
                "Tu último movimiento fue una compra de 35€ en Amazon.",
            ),
            answer(&["saldo"], "Tu saldo actual es de 1.275,45€."),
            answer(
                &["extracto"],
                "Tu extracto de abril incluye 18 movimientos por un total de 1.052€.",
            ),
            answer(
                &["recibo", "luz", "agua", "internet"],
                "Tu último recibo de internet fue de 44,90€ y se cargó el día 3 de este mes.",
            ),
            answer(&["iban"], "Tu IBAN es ES6600190020961234567890."),
            answer(
                &["cajero", "oficina", "localizar"],
                "Puedes encontrar la oficina o cajero más cercano en nuestra app, sección 'Dónde estamos'.",
            ),
            answer(
                &["ingreso", "entrada de dinero"],
                "Recibiste un ingreso de 1.200€ el pasado 27 de abril.",
            ),
            answer(
                &["límite", "tarjeta"],
                "El límite de tu tarjeta actual es de 2.000€ mensuales.",
            ),
            answer(&["divisa", "cambio"], "El tipo de cambio actual EUR/USD es 1,09."),
            answer(
                &["último acceso", "seguridad"],
                "Tu último acceso fue el 2 de mayo a las 17:42 desde la app móvil.",
            ),
        ],
        fallback: "No tengo información suficiente para responder a tu consulta específica."
            .to_string(),
    }
}

fn cuentas() -> CatalogConfig {
    CatalogConfig {
        normalization: Normalization::Fold,
        rules: vec![
            KeywordRule::all(
                &["abrir", "cuenta"],
                "Tu cuenta ha sido abierta correctamente con IBAN ES6600190020961234567890."
                    .to_string(),
            ),
            answer(
                &["tipo de cuenta", "tipos de cuenta"],
                "Ofrecemos cuentas corrientes, cuentas nómina y cuentas de ahorro sin comisiones de mantenimiento.",
            ),
            answer(
                &["requisito", "condicion"],
                "Para abrir una cuenta necesitas ser mayor de edad, presentar DNI y un justificante de domicilio.",
            ),
            answer(&["comision"], "Las cuentas estándar no tienen comisiones."),
            KeywordRule {
                any_of: vec!["cambiar".to_string(), "convertir".to_string()],
                all_of: vec!["cuenta".to_string()],
                value: "Podemos ayudarte a convertir tu cuenta actual en una cuenta nómina si cumples las condiciones."
                    .to_string(),
            },
            answer(
                &["plazo", "apertura"],
                "El proceso de apertura es inmediato si se hace online. En oficina puede tardar 24-48h.",
            ),
        ],
        fallback: "No he encontrado información sobre eso. ¿Quieres saber cómo abrir una cuenta o los requisitos?"
            .to_string(),
    }
}

fn identidad() -> CatalogConfig {
    CatalogConfig {
        normalization: Normalization::Lowercase,
        rules: vec![
            answer(
                &["dni", "nie"],
                "Tu documento ha sido validado correctamente. Coincide con nuestros registros.",
            ),
            answer(
                &["sms", "código", "llamada"],
                "Código verificado correctamente. Tu sesión es segura.",
            ),
            answer(
                &["correo", "email"],
                "Tu correo ha sido confirmado. Ya puedes continuar con tu operación.",
            ),
            answer(
                &["dos factores", "2fa"],
                "Autenticación en dos pasos completada correctamente.",
            ),
            answer(
                &["identidad"],
                "Identidad verificada con éxito para el usuario Juan Pérez.",
            ),
        ],
        fallback: "No se ha podido determinar el tipo de verificación. Por favor, especifica el método (DNI, SMS, correo...)."
            .to_string(),
    }
}

fn ia() -> CatalogConfig {
    CatalogConfig {
        normalization: Normalization::Lowercase,
        rules: vec![
            answer(&["hipoteca"], "Actualmente el tipo de interés para hipotecas es del 3,2%."),
            answer(
                &["tarjeta"],
                "Puedes solicitar una tarjeta desde la app o acudiendo a una oficina.",
            ),
            answer(
                &["transferencia"],
                "Una transferencia nacional tarda aproximadamente 24h hábiles.",
            ),
            answer(
                &["comisión"],
                "La comisión de mantenimiento es de 10€ trimestrales, pero puede eliminarse cumpliendo ciertos requisitos.",
            ),
            answer(
                &["oficina"],
                "Nuestro horario de atención en oficinas es de lunes a viernes de 8:30 a 14:00.",
            ),
            answer(
                &["certificado"],
                "Puedes descargar tu certificado de titularidad bancaria desde la app o el área de cliente web.",
            ),
            answer(
                &["préstamo"],
                "Ofrecemos préstamos personales desde un 5,5% TIN con aprobación rápida online.",
            ),
            answer(
                &["inversión"],
                "Contamos con planes de inversión adaptados a tu perfil de riesgo, consulta con tu asesor.",
            ),
        ],
        fallback: "Lo siento, no tengo información sobre eso en este momento.".to_string(),
    }
}

/// Default orchestrator dispatch: consultas, then cuentas, then identidad, else ia.
pub fn dispatch() -> DispatchConfig {
    DispatchConfig {
        normalization: Normalization::Lowercase,
        rules: vec![
            KeywordRule::any(
                &[
                    "movimiento", "saldo", "extracto", "recibo", "luz", "agua", "internet",
                    "iban", "cajero", "oficina", "ingreso", "tarjeta", "límite", "divisa",
                    "cambio", "seguridad", "acceso", "comprado", "compra", "últimamente",
                ],
                ServiceKind::Consultas,
            ),
            KeywordRule::any(
                &[
                    "abrir cuenta", "cuenta nueva", "tipo de cuenta", "tipos de cuenta",
                    "requisito", "documentación", "comisión", "cambiar cuenta",
                    "convertir cuenta", "plazo", "tiempo",
                ],
                ServiceKind::Cuentas,
            ),
            KeywordRule::any(
                &[
                    "dni", "nie", "sms", "código", "correo", "email", "2fa",
                    "verificar identidad", "autenticación", "doble factor", "identidad",
                ],
                ServiceKind::Identidad,
            ),
        ],
        fallback: ServiceKind::Ia,
    }
}
