use crate::catalog::CatalogFilter;
use crate::models::{CatalogCard, Notice, NoticeLevel, RoutineForm, SelectionEntry};
use crate::submission::DialogState;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use urlencoding::encode;

pub struct CatalogPage<'a> {
    pub title: &'a str,
    pub path: &'a str,
    pub cards: &'a [CatalogCard],
    pub categories: &'a [String],
    pub filter: &'a CatalogFilter,
    pub selected_count: usize,
}

pub fn render_catalog(page: &CatalogPage<'_>) -> Markup {
    let back = format!("{}{}", page.path, filter_query(page.filter));
    let any_visible = page.cards.iter().any(|card| card.visible);

    layout(page.title, html! {
        header {
            h1 { (page.title) }
            a # "carrito-ejercicios" href="/rutina" {
                "🛒 Rutina (" span # "carrito-counter" { (page.selected_count) } ")"
            }
        }
        form.filtros method="get" action=(page.path) {
            input # "filtro-texto" name="q" value=(page.filter.text) placeholder="Buscar ejercicio";
            select # "filtro-tipo" name="tipo" {
                option value="" { "Todos los tipos" }
                @for category in page.categories {
                    option value=(category) selected[category.to_lowercase() == page.filter.category.to_lowercase()] {
                        (category)
                    }
                }
            }
            button type="submit" { "Filtrar" }
        }
        section.grid {
            @for card in page.cards {
                (render_card(card, &back))
            }
            @if !any_visible {
                p.empty { "No hay ejercicios que coincidan con el filtro." }
            }
        }
    })
}

fn render_card(card: &CatalogCard, back: &str) -> Markup {
    let item = &card.item;
    html! {
        div.col.hide[!card.visible] {
            article.ejercicio-card.seleccionado[card.selected].hide[!card.visible] data-id=(item.id) {
                h3 { (item.name) }
                p { (item.description) }
                p.meta {
                    (item.category)
                    @if !item.level.is_empty() {
                        " · " (item.level)
                    }
                }
                form method="post" action="/seleccion/toggle" {
                    input type="hidden" name="id" value=(item.id);
                    input type="hidden" name="back" value=(back);
                    button.btn-agregar type="submit" {
                        @if card.selected { "✔ Añadido" } @else { "➕ Agregar a rutina" }
                    }
                }
            }
        }
    }
}

pub fn render_review(entries: &[SelectionEntry], state: &DialogState, form: &RoutineForm) -> Markup {
    let submitting = *state == DialogState::Submitting;
    let message = match state {
        DialogState::Open { message } => message.as_deref(),
        _ => None,
    };

    layout("Crear rutina manual", html! {
        header {
            h1 { "Crear rutina manual" }
            a href="/" { "Volver al catálogo" }
        }
        div {
            strong { "Ejercicios seleccionados (" (entries.len()) "):" }
            ul {
                @for entry in entries {
                    li {
                        b { (entry.name) }
                        @if !entry.level.is_empty() {
                            " " span.nivel { "[" (entry.level) "]" }
                        }
                        form.quitar method="post" action={ "/rutina/quitar/" (encode(&entry.id)) } {
                            button type="submit" { "✖" }
                        }
                    }
                }
            }
        }
        @if let Some(message) = message {
            p.validation { (message) }
        }
        form method="post" action="/rutina" {
            input #rutinaNombre name="name" value=(form.name) placeholder="Nombre de la rutina";
            textarea #rutinaDesc name="description" placeholder="Descripción (opcional)" { (form.description) }
            hr;
            label { "¿Asignar al calendario ahora?" }
            input #rutinaFecha name="date" type="date" value=(form.date.as_deref().unwrap_or_default());
            textarea #rutinaNotas name="notes" placeholder="Notas para el calendario (opcional)" {
                (form.notes.as_deref().unwrap_or_default())
            }
            button type="submit" disabled[submitting] {
                @if submitting { "Guardando…" } @else { "Guardar rutina" }
            }
            a href="/" { "Cancelar" }
        }
    })
}

pub fn render_notice(notice: &Notice, selected_count: usize) -> Markup {
    let level = match notice.level {
        NoticeLevel::Success => "success",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };

    layout(&notice.title, html! {
        section class={ "notice " (level) } {
            h1 { (notice.title) }
            p { (notice.text) }
        }
        p {
            a href="/" { "Volver al catálogo" }
            " · "
            a href="/rutina" { "Rutina (" (selected_count) ")" }
        }
    })
}

pub fn filter_query(filter: &CatalogFilter) -> String {
    if filter.is_empty() {
        return String::new();
    }
    format!("?q={}&tipo={}", encode(&filter.text), encode(&filter.category))
}

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "AthletIA · " (title) }
                style { (PreEscaped(STYLE)) }
            }
            body { (body) }
        }
    }
}

const STYLE: &str = r#"
    :root {
      --bg: #031820;
      --ink: #e8fdf8;
      --accent: #00ffbf;
      --danger: #ff4b4b;
      --card: rgba(255, 255, 255, 0.06);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      padding: 24px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 16px;
      margin-bottom: 20px;
    }

    a {
      color: var(--accent);
    }

    .filtros {
      display: flex;
      gap: 12px;
      margin-bottom: 20px;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
      gap: 16px;
    }

    .ejercicio-card {
      background: var(--card);
      border: 1px solid #123;
      border-radius: 14px;
      padding: 16px;
    }

    .ejercicio-card.seleccionado {
      border-color: var(--accent);
    }

    .hide {
      display: none;
    }

    .meta,
    .nivel {
      color: var(--accent);
      font-size: 0.85rem;
    }

    .btn-agregar,
    button {
      border: none;
      border-radius: 999px;
      padding: 8px 14px;
      cursor: pointer;
      font-weight: 600;
    }

    .quitar {
      display: inline;
    }

    .quitar button {
      background: none;
      color: var(--danger);
    }

    .validation,
    .notice.error {
      color: var(--danger);
    }

    .notice.warning {
      color: #ffd166;
    }

    .notice.success {
      color: var(--accent);
    }

    input,
    textarea,
    select {
      display: block;
      width: min(420px, 100%);
      margin: 8px 0;
      padding: 8px;
      border-radius: 8px;
      border: 1px solid #123;
    }
"#;
