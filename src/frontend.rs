use serde_json::json;
use std::rc::Rc;
use web_sys::window;
use yew::prelude::*;

use crate::config::{CertificateEntry, PageConfig, ProjectEntry, SectionEntry, SiteCatalog};
use crate::logging::{log_event, print_banner, set_min_level, LogLevel};
use crate::{dom, dom_shell};

fn load_catalog() -> SiteCatalog {
    SiteCatalog::embedded().unwrap_or_else(|error| {
        log_event(
            LogLevel::Error,
            "site_catalog_invalid",
            json!({ "error": error.to_string() }),
        );
        SiteCatalog::default()
    })
}

fn page_config() -> PageConfig {
    let search = window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    PageConfig::from_query(&search)
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()));
        log_event(
            LogLevel::Error,
            "panic",
            json!({ "message": info.to_string(), "location": location }),
        );
    }));
}

#[derive(Properties, PartialEq)]
struct NavigationProps {
    owner: AttrValue,
    sections: Rc<Vec<SectionEntry>>,
}

#[function_component(Navigation)]
fn navigation(props: &NavigationProps) -> Html {
    html! {
        <header id="header" class="header">
            <nav class="nav" aria-label="Primary">
                <a class="logo-text" href="#home">{props.owner.clone()}</a>
                <ul id="nav-menu" class="nav-menu">
                    { for props.sections.iter().map(|section| html! {
                        <li>
                            <a class="nav-link" href={format!("#{}", section.id)}>{section.label.clone()}</a>
                        </li>
                    }) }
                </ul>
                <button id="nav-toggle" class="nav-toggle" type="button" aria-label="Toggle navigation">
                    <span class="bar"></span>
                    <span class="bar"></span>
                    <span class="bar"></span>
                </button>
            </nav>
        </header>
    }
}

#[derive(Properties, PartialEq)]
struct ProjectCardProps {
    project: ProjectEntry,
}

#[function_component(ProjectCard)]
fn project_card(props: &ProjectCardProps) -> Html {
    let project = &props.project;
    let poster = project.thumbnail.clone().or_else(|| project.image.clone());

    html! {
        <article
            class="project-card"
            data-media-type={project.media_kind.as_str()}
            data-video-src={project.video.clone()}
            data-image-src={project.image.clone()}
            data-thumbnail={project.thumbnail.clone()}
        >
            <div class="project-media">
                if let Some(poster) = poster {
                    <img class="project-thumbnail" src={poster} alt={project.title.clone()} loading="lazy" />
                }
            </div>
            <div class="project-copy">
                <h3 class="project-title">{project.title.clone()}</h3>
                <p class="project-summary">{project.summary.clone()}</p>
                <ul class="project-tags">
                    { for project.tags.iter().map(|tag| html! { <li>{tag.clone()}</li> }) }
                </ul>
            </div>
        </article>
    }
}

#[derive(Properties, PartialEq)]
struct CertificateCardProps {
    certificate: CertificateEntry,
}

#[function_component(CertificateCard)]
fn certificate_card(props: &CertificateCardProps) -> Html {
    let certificate = &props.certificate;

    html! {
        <button
            class="certificate-card"
            type="button"
            data-certificate-image={certificate.image.clone()}
            data-certificate-title={certificate.title.clone()}
            data-certificate-issuer={certificate.issuer.clone()}
            data-certificate-date={certificate.date.clone()}
        >
            <span class="certificate-title">{certificate.title.clone()}</span>
            <span class="muted">{format!("{} · {}", certificate.issuer, certificate.date)}</span>
        </button>
    }
}

#[function_component(VideoModalOverlay)]
fn video_modal_overlay() -> Html {
    html! {
        <div id="video-modal" class="video-modal" role="dialog" aria-modal="true" aria-label="Project video">
            <div class="video-backdrop"></div>
            <div class="video-dialog">
                <button class="video-close" type="button" aria-label="Close video">{"×"}</button>
                <video id="modal-video" controls="controls" playsinline="playsinline" preload="none"></video>
            </div>
        </div>
    }
}

#[function_component(CertificateModalOverlay)]
fn certificate_modal_overlay() -> Html {
    html! {
        <div id="certificate-modal" class="certificate-modal" role="dialog" aria-modal="true" aria-label="Certificate">
            <div class="certificate-backdrop"></div>
            <div class="certificate-dialog">
                <button class="certificate-close" type="button" aria-label="Close certificate">{"×"}</button>
                <img id="modal-certificate" alt="" />
                <div class="certificate-info">
                    <h3 id="modal-certificate-title"></h3>
                    <p id="modal-certificate-issuer"></p>
                    <p id="modal-certificate-date" class="muted"></p>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    config: PageConfig,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let catalog = use_memo((), |_| load_catalog());
    let sections = use_memo((), {
        let catalog = catalog.clone();
        move |_| catalog.sections.clone()
    });

    {
        let config = props.config.clone();
        use_effect_with((), move |_| {
            let installed = window().and_then(|w| {
                let document = w.document()?;
                let media = dom::install(&document);
                let shell = dom_shell::install(&w, &document, &config);
                Some((media, shell))
            });
            move || drop(installed)
        });
    }

    html! {
        <>
            <Navigation owner={catalog.owner.clone()} sections={sections} />
            <main id="content">
                <section id="home" class="section-block hero">
                    <div class="bg-pattern" aria-hidden="true"></div>
                    <h1 class="title-main">{catalog.owner.clone()}</h1>
                    <p class="tagline">{catalog.tagline.clone()}</p>
                </section>

                <section id="projects" class="section-block" aria-labelledby="projects-heading">
                    <h2 id="projects-heading">{"Projects"}</h2>
                    <div class="project-grid">
                        { for catalog.projects.iter().map(|project| html! {
                            <ProjectCard project={project.clone()} />
                        }) }
                    </div>
                </section>

                <section id="certificates" class="section-block" aria-labelledby="certificates-heading">
                    <h2 id="certificates-heading">{"Certificates"}</h2>
                    <div class="certificate-grid">
                        { for catalog.certificates.iter().map(|certificate| html! {
                            <CertificateCard certificate={certificate.clone()} />
                        }) }
                    </div>
                </section>

                <section id="contact" class="section-block" aria-labelledby="contact-heading">
                    <h2 id="contact-heading">{"Contact"}</h2>
                    <p class="muted">{"Reach out for internships, CTF teams, or security research."}</p>
                </section>
            </main>
            <VideoModalOverlay />
            <CertificateModalOverlay />
        </>
    }
}

pub fn run() {
    let config = page_config();
    set_min_level(config.log_level);
    install_panic_hook();
    print_banner();

    yew::Renderer::<App>::with_root_and_props(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
        AppProps { config },
    )
    .render();
}
