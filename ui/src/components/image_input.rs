use dioxus::prelude::*;

use agrimarket_common::form::FilePart;
use agrimarket_common::upload::{accept_attr, validate_image};

use super::browser;
use super::shell::use_shell;

/// Image picker with type/size checks and an inline preview. A rejected
/// file clears the input and never reaches `on_change`.
#[component]
pub fn ImageInput(
    #[props(default = "image".to_string())] name: String,
    on_change: EventHandler<Option<FilePart>>,
) -> Element {
    let shell = use_shell();
    let mut preview = use_signal(|| None::<String>);
    // Re-keying the input is how it gets cleared.
    let mut input_gen = use_signal(|| 0u32);

    let mut clear_preview = move || {
        if let Some(url) = preview.write().take() {
            browser::revoke_preview_url(&url);
        }
    };

    rsx! {
        div { class: "image-input mb-3",
            for generation in std::iter::once(input_gen()) {
                input {
                    key: "{generation}",
                    r#type: "file",
                    class: "form-control",
                    name: "{name}",
                    accept: accept_attr(),
                    onchange: move |evt: FormEvent| {
                        let Some(file) = evt.files().into_iter().next() else {
                            clear_preview();
                            on_change.call(None);
                            return;
                        };
                        let content_type = file.content_type().unwrap_or_default();
                        if let Err(e) = validate_image(&content_type, file.size()) {
                            shell.error(e.to_string());
                            clear_preview();
                            input_gen += 1;
                            on_change.call(None);
                            return;
                        }
                        spawn(async move {
                            match file.read_bytes().await {
                                Ok(bytes) => {
                                    let bytes = bytes.to_vec();
                                    clear_preview();
                                    preview.set(browser::image_preview_url(&bytes, &content_type));
                                    on_change.call(Some(FilePart {
                                        file_name: file.name(),
                                        content_type,
                                        bytes,
                                    }));
                                }
                                Err(e) => {
                                    tracing::warn!("Could not read {}: {e}", file.name());
                                    shell.error("Could not read the selected file");
                                    on_change.call(None);
                                }
                            }
                        });
                    },
                }
            }
            if let Some(url) = preview.read().as_ref() {
                img {
                    class: "img-thumbnail mt-2 image-preview",
                    src: "{url}",
                    alt: "Preview",
                    style: "max-width: 200px;",
                }
            }
        }
    }
}
