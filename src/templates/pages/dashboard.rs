use maud::{html, Markup, PreEscaped};
use serde_json::json;
use url::form_urlencoded;

use crate::dashboard::{Criterios, VistaDashboard};
use crate::templates::components::{kpi_card, municipio_card};
use crate::templates::dashboard_layout;

pub struct DashboardVm<'a> {
    pub criterios: &'a Criterios,
    pub tipos: &'a [String],
    pub departamentos: &'a [String],
    pub comunidades: &'a [String],
    pub limites_anos: (i32, i32),
    pub costo_max_millones: f64,
    pub vista: &'a VistaDashboard,
    /// Data URIs; `None` degrades to text.
    pub logo: Option<String>,
    pub huella: Option<String>,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    let filtros = query_filtros(vm.criterios);
    let vista = vm.vista;

    // Payload for the map bootstrap. Clicks navigate through enlaceBase so
    // the filters survive a map selection.
    let datos_mapa = json!({
        "centro": vista.mapa.centro,
        "geojson": vista.mapa.geojson,
        "mensaje": vista.mapa.mensaje,
        "enlaceBase": format!("/?{filtros}"),
    })
    .to_string();

    dashboard_layout(
        "Dashboard de Proyectos Fundación AIP",
        html! {
            div class="container" {
                header class="encabezado" {
                    h1 {
                        "NUESTRA HUELLA EN COLOMBIA"
                        @if let Some(huella) = &vm.huella {
                            img class="huella" src=(huella) alt="Huella AIP";
                        }
                    }
                    @if let Some(logo) = &vm.logo {
                        img class="logo" src=(logo) alt="Fundación AIP";
                    } @else {
                        div class="logo-placeholder" { "Fundación AIP" }
                    }
                }

                (filtros_form(vm))

                h2 class="section-title" { "INFORMACIÓN GENERAL DE LOS PROYECTOS" }
                section class="kpis" {
                    (kpi_card("📌 TOTAL PROYECTOS", &vista.kpis.proyectos))
                    (kpi_card("💰 INVERSIÓN TOTAL", &vista.kpis.inversion))
                    (kpi_card("👥 BENEFICIARIOS", &vista.kpis.beneficiarios))
                    (kpi_card("🌿 ÁREA INTERVENIDA", &vista.kpis.area))
                }

                h2 class="section-title" { "INFORMACIÓN ESPECÍFICA DE LOS PROYECTOS POR MUNICIPIO" }
                section class="mapa-y-lista" {
                    div class="map-container" {
                        div class="map-title" {
                            "Ubicación Geográfica de los Proyectos por Municipio"
                            @if let Some(m) = &vista.municipio_titulo {
                                span class="municipio-resaltado" { " " (m) }
                            }
                        }
                        div id="mapa" {}
                        script type="application/json" id="mapa-datos" {
                            (PreEscaped(datos_mapa))
                        }
                        @if vista.mapa.sin_geometria > 0 {
                            div class="mapa-diagnostico" {
                                (vista.mapa.sin_geometria) " proyectos sin ubicación geográfica"
                            }
                        }
                    }

                    aside class="municipios-list" {
                        div class="municipios-title" { "MUNICIPIOS CON PROYECTOS" }
                        @if vista.tarjetas.is_empty() {
                            div class="sin-municipios" { "No hay municipios con los filtros actuales" }
                        } @else {
                            @for tarjeta in &vista.tarjetas {
                                (municipio_card(tarjeta, &enlace(&filtros, "municipio", &tarjeta.nombre)))
                            }
                        }
                        @if vista.municipio_titulo.is_some() {
                            a class="quitar-seleccion" href=(enlace(&filtros, "reset", "1")) {
                                "Quitar selección"
                            }
                        }
                    }
                }

                section class="info-panel" {
                    (detalle_box("📍 MUNICIPIO SELECCIONADO", &vista.detalle.municipio))
                    (detalle_box("🏦 ENTIDAD FINANCIADORA", &vista.detalle.financiador))
                    (detalle_box("⏳ DURACIÓN (MESES)", &vista.detalle.duracion))
                    (detalle_box("👥 CANTIDAD BENEFICIARIOS", &vista.detalle.beneficiarios))
                    (detalle_box("🌳 HECTÁREAS INTERVENIDAS", &vista.detalle.area))
                    (detalle_box("📦 PRODUCTO PRINCIPAL", &vista.detalle.producto))
                }

                section class="photo-panel" {
                    div class="photo-selector" {
                        div class="photo-title" { "SELECCIONAR UN PROYECTO" }
                        @if vista.opciones_proyecto.is_empty() {
                            p class="photo-hint" { "Seleccione un municipio para ver sus proyectos" }
                        } @else {
                            form method="get" action="/" {
                                (campos_filtros_ocultos(vm.criterios))
                                select name="proyecto" onchange="this.form.submit()" {
                                    @for opcion in &vista.opciones_proyecto {
                                        option value=(opcion.id) selected[opcion.elegido] {
                                            (opcion.etiqueta)
                                        }
                                    }
                                }
                            }
                        }
                    }
                    div class="photo-content" {
                        div class="photo-title" { "EVIDENCIA FOTOGRÁFICA INICIAL Y FINAL DEL PROYECTO" }
                        div class="photo-buttons" {
                            @for foto in &vista.fotos {
                                button
                                    type="button"
                                    class="photo-button"
                                    onclick=(format!("document.getElementById('foto-{}').showModal()", foto.numero))
                                {
                                    "Ver evidencia " (foto.numero)
                                }
                            }
                        }
                    }
                }

                @for foto in &vista.fotos {
                    dialog id=(format!("foto-{}", foto.numero)) class="photo-modal" {
                        img src=(foto.data_uri) alt=(format!("Evidencia fotográfica {}", foto.numero));
                        form method="dialog" {
                            button { "Cerrar" }
                        }
                    }
                }
            }
        },
    )
}

fn filtros_form(vm: &DashboardVm) -> Markup {
    let c = vm.criterios;
    html! {
        form class="filtros" method="get" action="/" {
            div class="filtros-grid" {
                div {
                    label for="tipo" { "TIPO DE PROYECTO" }
                    select id="tipo" name="tipo" multiple {
                        @for t in vm.tipos {
                            option value=(t) selected[c.tipos.contains(t)] { (t) }
                        }
                    }
                }
                div {
                    label for="departamento" { "DEPARTAMENTO" }
                    select id="departamento" name="departamento" multiple {
                        @for d in vm.departamentos {
                            option value=(d) selected[c.departamentos.contains(d)] { (d) }
                        }
                    }
                }
                div {
                    label for="comunidad" { "COMUNIDAD BENEFICIARIA" }
                    select id="comunidad" name="comunidad" multiple {
                        @for co in vm.comunidades {
                            option value=(co) selected[c.comunidades.contains(co)] { (co) }
                        }
                    }
                }
                div {
                    label { "RANGO DE COSTOS (MILLONES $COP)" }
                    div class="rango" {
                        input type="number" name="costo_min" min="0" step="50"
                            max=(vm.costo_max_millones) value=(c.costos_millones.0);
                        input type="number" name="costo_max" min="0" step="50"
                            max=(vm.costo_max_millones) value=(c.costos_millones.1);
                    }
                }
                div {
                    label { "RANGO DE AÑOS" }
                    div class="rango" {
                        input type="number" name="ano_min" min=(vm.limites_anos.0)
                            max=(vm.limites_anos.1) value=(c.anos.0);
                        input type="number" name="ano_max" min=(vm.limites_anos.0)
                            max=(vm.limites_anos.1) value=(c.anos.1);
                    }
                }
                div class="filtros-acciones" {
                    button type="submit" { "Aplicar filtros" }
                    a href="/" { "Limpiar" }
                    a href=(format!("/export?{}", query_filtros(c))) { "Descargar XLSX" }
                }
            }
        }
    }
}

fn detalle_box(titulo: &str, valor: &str) -> Markup {
    html! {
        div class="info-box" {
            div class="info-title" { (titulo) }
            div class="info-value" { (valor) }
        }
    }
}

/// The picker form re-submits the whole criteria so choosing a project never
/// resets the filters.
fn campos_filtros_ocultos(c: &Criterios) -> Markup {
    html! {
        @for t in &c.tipos {
            input type="hidden" name="tipo" value=(t);
        }
        @for d in &c.departamentos {
            input type="hidden" name="departamento" value=(d);
        }
        @for co in &c.comunidades {
            input type="hidden" name="comunidad" value=(co);
        }
        input type="hidden" name="ano_min" value=(c.anos.0);
        input type="hidden" name="ano_max" value=(c.anos.1);
        input type="hidden" name="costo_min" value=(c.costos_millones.0);
        input type="hidden" name="costo_max" value=(c.costos_millones.1);
    }
}

/// Query string that reproduces the current criteria; base of every
/// selection link.
pub fn query_filtros(c: &Criterios) -> String {
    let mut s = form_urlencoded::Serializer::new(String::new());
    for t in &c.tipos {
        s.append_pair("tipo", t);
    }
    for d in &c.departamentos {
        s.append_pair("departamento", d);
    }
    for co in &c.comunidades {
        s.append_pair("comunidad", co);
    }
    s.append_pair("ano_min", &c.anos.0.to_string());
    s.append_pair("ano_max", &c.anos.1.to_string());
    s.append_pair("costo_min", &c.costos_millones.0.to_string());
    s.append_pair("costo_max", &c.costos_millones.1.to_string());
    s.finish()
}

fn enlace(filtros: &str, clave: &str, valor: &str) -> String {
    let extra = form_urlencoded::Serializer::new(String::new())
        .append_pair(clave, valor)
        .finish();
    format!("/?{filtros}&{extra}")
}
