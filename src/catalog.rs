//! Static project catalogue and filter chip definitions.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: &'static str,
    pub title: &'static str,
    pub detail_path: &'static str,
    pub summary: &'static str,
    pub highlights: &'static [&'static str],
    pub tags: &'static [&'static str],
    pub filters: &'static [&'static str],
}

impl ProjectSummary {
    pub fn has_filter(&self, tag: &str) -> bool {
        self.filters.contains(&tag)
    }

    pub fn filter_attr(&self) -> String {
        self.filters.join(" ")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterOption {
    pub id: &'static str,
    pub label: &'static str,
}

pub static PROJECTS: &[ProjectSummary] = &[
    ProjectSummary {
        id: "admin-suite",
        title: "Sistema de Administración",
        detail_path: "pages/portafolio/proyectos/sistema-administracion.html",
        summary: "Administración integral de ventas, ingresos y egresos con control granular de inventario y reportes financieros inmediatos.",
        highlights: &[
            "Panel financiero consolidado con indicadores en tiempo real",
            "Módulo de usuarios con permisos flexibles y trazabilidad",
            "Generación automática de reportes en PDF y hojas de cálculo",
        ],
        tags: &["Software", "Administración", "Dashboard"],
        filters: &["software", "administracion", "dashboard"],
    },
    ProjectSummary {
        id: "automation-hub",
        title: "Automatización Operativa",
        detail_path: "pages/portafolio/proyectos/automatizacion-operativa.html",
        summary: "Automatización de tareas críticas para mejorar la eficiencia y reducir errores humanos dentro de la empresa.",
        highlights: &[
            "Orquestación de procesos con bots y validaciones inteligentes",
            "Integración de APIs y servicios internos en un solo flujo",
            "Alertas proactivas y bitácora de auditoría automatizada",
        ],
        tags: &["Automatización", "Integraciones", "RPA"],
        filters: &["automatizacion", "automatizacion-avanzada"],
    },
    ProjectSummary {
        id: "insight-dashboard",
        title: "Dashboard Estratégico",
        detail_path: "pages/portafolio/proyectos/dashboard-estrategico.html",
        summary: "Diseño y desarrollo de dashboard responsive para visualizar, filtrar y accionar datos clave en múltiples dispositivos.",
        highlights: &[
            "Visualizaciones interactivas con filtros contextuales",
            "Modo claro y oscuro sincronizados con las preferencias del usuario",
            "Exportación segmentada de datasets y estados del tablero",
        ],
        tags: &["Dashboard", "UI/UX", "Responsive"],
        filters: &["ui-ux", "dashboard"],
    },
    ProjectSummary {
        id: "learning-platform",
        title: "Plataforma Educativa",
        detail_path: "pages/portafolio/proyectos/plataforma-educativa.html",
        summary: "Ecosistema educativo completo con gestión de cursos, evaluaciones adaptivas y analítica de progreso.",
        highlights: &[
            "Experiencia multi-rol para estudiantes, tutores y administradores",
            "Streaming de contenidos y recursos descargables sin fricciones",
            "Analítica de engagement y métricas de evolución académica",
        ],
        tags: &["Educación", "Multiplataforma", "Desarrollo web"],
        filters: &["web", "educacion"],
    },
    ProjectSummary {
        id: "game-dev",
        title: "Desarrollo de Juegos Web",
        detail_path: "pages/portafolio/proyectos/desarrollo-juegos-web.html",
        summary: "Creación de juegos interactivos con lógica compleja, IA avanzada y experiencias inmersivas directamente en el navegador.",
        highlights: &[
            "Ajedrez completo con motor minimax y diferentes niveles de IA",
            "Ruleta 21 con sistema de ritos únicos y mecánicas innovadoras",
            "Animaciones fluidas y controles adaptativos para todos los dispositivos",
        ],
        tags: &["Juegos", "JavaScript", "IA"],
        filters: &["juegos"],
    },
];

pub static CATEGORY_OPTIONS: &[FilterOption] = &[
    FilterOption { id: "all", label: "Todas las categorías" },
    FilterOption { id: "software", label: "Software a medida" },
    FilterOption { id: "automatizacion", label: "Automatización" },
    FilterOption { id: "ui-ux", label: "Diseño UI/UX" },
    FilterOption { id: "web", label: "Sitios y plataformas web" },
    FilterOption { id: "juegos", label: "Juegos web" },
];

pub static FOCUS_OPTIONS: &[FilterOption] = &[
    FilterOption { id: "all", label: "Todos los enfoques" },
    FilterOption { id: "administracion", label: "Administración" },
    FilterOption { id: "dashboard", label: "Dashboards" },
    FilterOption { id: "automatizacion-avanzada", label: "Automatización avanzada" },
    FilterOption { id: "educacion", label: "Educación" },
    FilterOption { id: "juegos", label: "Juegos interactivos" },
];

/// Resolves a project page path against the current location so links work
/// from the home page and from nested pages alike.
pub fn resolve_detail_path(detail_path: &str, pathname: &str) -> String {
    if detail_path.is_empty() {
        return "#".to_string();
    }

    let lower = detail_path.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return detail_path.to_string();
    }

    let normalized = detail_path.trim_start_matches('/');
    let mut base = match pathname.find("/pages/") {
        Some(index) => pathname[..=index].to_string(),
        None => pathname
            .rfind('/')
            .map(|index| pathname[..=index].to_string())
            .unwrap_or_default(),
    };
    if !base.ends_with('/') {
        base.push('/');
    }

    collapse_slashes(&format!("{base}{normalized}"))
}

fn collapse_slashes(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    let mut previous_slash = false;
    for character in path.chars() {
        let is_slash = character == '/';
        if !(is_slash && previous_slash) {
            collapsed.push(character);
        }
        previous_slash = is_slash;
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_ids_are_unique() {
        let mut ids: Vec<&str> = PROJECTS.iter().map(|project| project.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), PROJECTS.len());
    }

    #[test]
    fn every_axis_starts_with_all() {
        assert_eq!(CATEGORY_OPTIONS[0].id, "all");
        assert_eq!(FOCUS_OPTIONS[0].id, "all");
    }

    #[test]
    fn detail_path_from_home_page() {
        assert_eq!(
            resolve_detail_path("pages/portafolio/proyectos/a.html", "/site/index.html"),
            "/site/pages/portafolio/proyectos/a.html"
        );
        assert_eq!(
            resolve_detail_path("/pages/b.html", "/"),
            "/pages/b.html"
        );
    }

    #[test]
    fn detail_path_from_nested_page() {
        assert_eq!(
            resolve_detail_path(
                "pages/portafolio/proyectos/a.html",
                "/site/pages/portafolio/index.html"
            ),
            "/site/pages/portafolio/proyectos/a.html"
        );
    }

    #[test]
    fn absolute_and_empty_paths() {
        assert_eq!(
            resolve_detail_path("HTTPS://example.com/x", "/"),
            "HTTPS://example.com/x"
        );
        assert_eq!(resolve_detail_path("", "/"), "#");
        assert_eq!(resolve_detail_path("a.html", "index.html"), "/a.html");
    }
}
