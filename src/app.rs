use std::convert::TryFrom;

use base64::Engine;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::FileList;
use yew::prelude::*;

use crate::config::{PREVIEW_SIZE, SIZE_RANGE};
use crate::export::{self, artifact_file_name, ExportFormat};
use crate::history::{HistoryStore, KeyValueStore};
use crate::history_panel::HistoryPanel;
use crate::payload::encode;
use crate::qr_preview::QrPreview;
use crate::renderer::{QrCodegenRenderer, Renderer};
use crate::storage::browser_storage;
use crate::types::{
    DotStyle, Encryption, ErrorLevel, EyeStyle, FormRecord, GradientType, QrType,
};
use crate::validate::validate;

/// Text inputs bound to a string in the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Url,
    Text,
    Phone,
    EmailAddress,
    EmailSubject,
    EmailBody,
    WhatsAppPhone,
    WhatsAppMessage,
    WifiSsid,
    WifiPassword,
    Latitude,
    Longitude,
    FgColor,
    BgColor,
    EyeColor,
    GradientStart,
    GradientEnd,
}

impl Field {
    fn get(self, form: &FormRecord) -> &str {
        match self {
            Field::Url => &form.url,
            Field::Text => &form.text,
            Field::Phone => &form.phone,
            Field::EmailAddress => &form.email.address,
            Field::EmailSubject => &form.email.subject,
            Field::EmailBody => &form.email.body,
            Field::WhatsAppPhone => &form.whatsapp.phone,
            Field::WhatsAppMessage => &form.whatsapp.message,
            Field::WifiSsid => &form.wifi.ssid,
            Field::WifiPassword => &form.wifi.password,
            Field::Latitude => &form.location.lat,
            Field::Longitude => &form.location.lng,
            Field::FgColor => &form.style.fg_color,
            Field::BgColor => &form.style.bg_color,
            Field::EyeColor => form.style.eye_color(),
            Field::GradientStart => &form.style.gradient_color1,
            Field::GradientEnd => &form.style.gradient_color2,
        }
    }

    fn get_mut(self, form: &mut FormRecord) -> &mut String {
        match self {
            Field::Url => &mut form.url,
            Field::Text => &mut form.text,
            Field::Phone => &mut form.phone,
            Field::EmailAddress => &mut form.email.address,
            Field::EmailSubject => &mut form.email.subject,
            Field::EmailBody => &mut form.email.body,
            Field::WhatsAppPhone => &mut form.whatsapp.phone,
            Field::WhatsAppMessage => &mut form.whatsapp.message,
            Field::WifiSsid => &mut form.wifi.ssid,
            Field::WifiPassword => &mut form.wifi.password,
            Field::Latitude => &mut form.location.lat,
            Field::Longitude => &mut form.location.lng,
            Field::FgColor => &mut form.style.fg_color,
            Field::BgColor => &mut form.style.bg_color,
            Field::EyeColor => form.style.eye_color.get_or_insert_with(String::new),
            Field::GradientStart => &mut form.style.gradient_color1,
            Field::GradientEnd => &mut form.style.gradient_color2,
        }
    }
}

fn export_notice(format: ExportFormat, result: &Result<(), JsValue>) -> String {
    let name = format.extension().to_uppercase();
    match result {
        Ok(()) => format!("{} exported", name),
        Err(_) => format!("{} export failed", name),
    }
}

/// Validation problems are shown but do not block saving.
fn can_save(name: &str) -> bool {
    !name.trim().is_empty()
}

pub struct Main {
    link: ComponentLink<Self>,
    form: FormRecord,
    renderer: Box<dyn Renderer>,
    history: HistoryStore<Box<dyn KeyValueStore>>,
    save_name: String,
    notice: Option<String>,
}

pub enum Msg {
    SetKind(QrType),
    Edit(Field, String),
    SetEncryption(Encryption),
    ToggleHidden,
    SetSize(String),
    SetLevel(ErrorLevel),
    ToggleMargin,
    SetDotStyle(DotStyle),
    SetEyeStyle(EyeStyle),
    SetGradient(GradientType),
    SetRotation(String),
    LogoSelected(FileList),
    SetLogo(Option<String>),
    Reset,
    SetSaveName(String),
    Save,
    Restore(String),
    Rename(String, String),
    Delete(String),
    ClearHistory,
    Download(ExportFormat),
    Exported(ExportFormat, Result<(), JsValue>),
    Ignore,
}

impl Main {
    fn download(&mut self, format: ExportFormat) {
        let payload = encode(&self.form);
        if payload.is_empty() {
            self.notice = Some("Nothing to export yet".to_owned());
            return;
        }

        let size = self
            .form
            .style
            .size
            .clamp(*SIZE_RANGE.start(), *SIZE_RANGE.end());
        let svg = match self.renderer.render_svg(&payload, &self.form.style, size) {
            Ok(svg) => svg,
            Err(err) => {
                self.notice = Some(err.to_string());
                return;
            }
        };
        let file_name = artifact_file_name(chrono::Utc::now().timestamp_millis(), format);

        match format {
            ExportFormat::Svg => {
                let result = export::download_svg(&svg, &file_name);
                self.exported(format, result);
            }
            ExportFormat::Png => {
                self.notice = Some("Rendering PNG…".to_owned());
                let link = self.link.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let result = export::download_png(svg, size, file_name).await;
                    link.send_message(Msg::Exported(format, result));
                });
            }
        }
    }

    fn exported(&mut self, format: ExportFormat, result: Result<(), JsValue>) {
        if let Err(err) = &result {
            log::error!("{} export failed: {:?}", format.extension(), err);
        }
        self.notice = Some(export_notice(format, &result));
    }

    fn read_logo(&self, files: FileList) {
        let file = match files.get(0) {
            Some(file) => file,
            None => return,
        };
        let link = self.link.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(file.array_buffer()).await {
                Ok(buffer) => {
                    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                    let data_url = format!(
                        "data:{};base64,{}",
                        file.type_(),
                        base64::engine::general_purpose::STANDARD.encode(bytes)
                    );
                    link.send_message(Msg::SetLogo(Some(data_url)));
                }
                Err(err) => log::error!("Failed reading logo: {:?}", err),
            }
        });
    }

    fn report<T>(&mut self, result: crate::Result<T>, success: &str) {
        self.notice = Some(match result {
            Ok(_) => success.to_owned(),
            Err(err) => {
                log::error!("History update failed: {}", err);
                err.to_string()
            }
        });
    }

    fn text_input(&self, label: &str, field: Field, kind: &'static str, placeholder: &'static str) -> Html {
        html! {
            <label>
                { label }
                <input
                    type=kind
                    placeholder=placeholder
                    value=field.get(&self.form).to_owned()
                    oninput=self.link.callback(move |input: InputData| Msg::Edit(field, input.value)) />
            </label>
        }
    }

    fn text_area(&self, label: &str, field: Field, placeholder: &'static str) -> Html {
        html! {
            <label>
                { label }
                <textarea
                    placeholder=placeholder
                    value=field.get(&self.form).to_owned()
                    oninput=self.link.callback(move |input: InputData| Msg::Edit(field, input.value)) />
            </label>
        }
    }

    fn select<T>(&self, label: &str, choices: &[(T, &'static str)], current: T, to_msg: fn(T) -> Msg) -> Html
    where
        T: Copy + PartialEq + 'static,
    {
        let values: Vec<T> = choices.iter().map(|(value, _)| *value).collect();
        let onchange = self.link.callback(move |change: ChangeData| match change {
            ChangeData::Select(select) => usize::try_from(select.selected_index())
                .ok()
                .and_then(|index| values.get(index).copied())
                .map_or(Msg::Ignore, to_msg),
            _ => Msg::Ignore,
        });

        html! {
            <label>
                { label }
                <select onchange=onchange>
                    { for choices.iter().map(|(value, text)| html! {
                        <option selected={ *value == current }>{ *text }</option>
                    }) }
                </select>
            </label>
        }
    }

    fn view_payload_fields(&self) -> Html {
        match self.form.kind {
            QrType::Url => self.text_input("Website URL", Field::Url, "url", "https://example.com"),
            QrType::Text => self.text_area("Content", Field::Text, "Enter your text here..."),
            QrType::Phone => self.text_input("Phone Number", Field::Phone, "tel", "+1 234 567 890"),
            QrType::Email => html! {
                <>
                    { self.text_input("Email Address", Field::EmailAddress, "email", "hello@example.com") }
                    { self.text_input("Subject", Field::EmailSubject, "text", "Inquiry") }
                    { self.text_area("Message", Field::EmailBody, "Write your message...") }
                </>
            },
            QrType::WhatsApp => html! {
                <>
                    { self.text_input("WhatsApp Number", Field::WhatsAppPhone, "tel", "+1 234 567 890") }
                    { self.text_area("Pre-filled Message", Field::WhatsAppMessage, "Hello!") }
                </>
            },
            QrType::Wifi => html! {
                <>
                    { self.text_input("Network Name (SSID)", Field::WifiSsid, "text", "MyNetwork") }
                    { self.text_input("Password", Field::WifiPassword, "password", "") }
                    { self.select(
                        "Encryption",
                        &[(Encryption::Wpa, "WPA/WPA2"), (Encryption::Wep, "WEP"), (Encryption::NoPass, "None")],
                        self.form.wifi.encryption,
                        Msg::SetEncryption,
                    ) }
                    <label>
                        <input type="checkbox" checked=self.form.wifi.hidden onclick=self.link.callback(|_| Msg::ToggleHidden) />
                        { "Hidden network" }
                    </label>
                </>
            },
            QrType::Location => html! {
                <>
                    { self.text_input("Latitude", Field::Latitude, "text", "40.7128") }
                    { self.text_input("Longitude", Field::Longitude, "text", "-74.0060") }
                </>
            },
            QrType::Unrecognized => html! {},
        }
    }

    fn view_style_controls(&self) -> Html {
        let style = &self.form.style;
        let gradient_controls = if style.gradient_type == GradientType::None {
            html! {}
        } else {
            html! {
                <>
                    { self.text_input("Gradient Start", Field::GradientStart, "color", "") }
                    { self.text_input("Gradient End", Field::GradientEnd, "color", "") }
                    <label>
                        { format!("Rotation ({}°)", style.gradient_rotation) }
                        <input type="range" min="0" max="360"
                            value=style.gradient_rotation.to_string()
                            oninput=self.link.callback(|input: InputData| Msg::SetRotation(input.value)) />
                    </label>
                </>
            }
        };
        let logo_controls = if style.logo().is_some() {
            html! {
                <button onclick=self.link.callback(|_| Msg::SetLogo(None)) class="mdi-set mdi-image-remove" title="Remove logo"></button>
            }
        } else {
            html! {}
        };

        html! {
            <fieldset class="style">
                <legend>{ "Design" }</legend>
                { self.text_input("Foreground", Field::FgColor, "color", "") }
                { self.text_input("Background", Field::BgColor, "color", "") }
                { self.text_input("Eye Color", Field::EyeColor, "color", "") }
                <label>
                    { format!("Export Size ({}px)", style.size) }
                    <input type="range" step="8"
                        min=SIZE_RANGE.start().to_string()
                        max=SIZE_RANGE.end().to_string()
                        value=style.size.to_string()
                        oninput=self.link.callback(|input: InputData| Msg::SetSize(input.value)) />
                </label>
                { self.select(
                    "Error Correction",
                    &[
                        (ErrorLevel::Low, "Low (7%)"),
                        (ErrorLevel::Medium, "Medium (15%)"),
                        (ErrorLevel::Quartile, "Quartile (25%)"),
                        (ErrorLevel::High, "High (30%)"),
                    ],
                    style.level,
                    Msg::SetLevel,
                ) }
                <label>
                    <input type="checkbox" checked=style.margin onclick=self.link.callback(|_| Msg::ToggleMargin) />
                    { "Quiet zone" }
                </label>
                { self.select(
                    "Dots",
                    &[
                        (DotStyle::Square, "Square"),
                        (DotStyle::Dots, "Dots"),
                        (DotStyle::Rounded, "Rounded"),
                        (DotStyle::ExtraRounded, "Extra rounded"),
                    ],
                    style.dots_pattern,
                    Msg::SetDotStyle,
                ) }
                { self.select(
                    "Eyes",
                    &[
                        (EyeStyle::Square, "Square"),
                        (EyeStyle::Dot, "Dot"),
                        (EyeStyle::ExtraRounded, "Extra rounded"),
                    ],
                    style.eye_style,
                    Msg::SetEyeStyle,
                ) }
                { self.select(
                    "Gradient",
                    &[
                        (GradientType::None, "None"),
                        (GradientType::Linear, "Linear"),
                        (GradientType::Radial, "Radial"),
                    ],
                    style.gradient_type,
                    Msg::SetGradient,
                ) }
                { gradient_controls }
                <label>
                    { "Logo" }
                    <input type="file" accept="image/*" multiple=false
                        onchange={ self.link.callback(|change: ChangeData| match change {
                            ChangeData::Files(files) => Msg::LogoSelected(files),
                            _ => Msg::Ignore,
                        }) } />
                </label>
                { logo_controls }
            </fieldset>
        }
    }
}

impl Component for Main {
    type Message = Msg;
    type Properties = ();

    fn create(_: Self::Properties, link: ComponentLink<Self>) -> Self {
        Self {
            link,
            form: FormRecord::default(),
            renderer: Box::new(QrCodegenRenderer),
            history: HistoryStore::open(browser_storage()),
            save_name: String::new(),
            notice: None,
        }
    }

    fn update(&mut self, msg: Self::Message) -> ShouldRender {
        match msg {
            Msg::SetKind(kind) => self.form.kind = kind,
            Msg::Edit(field, value) => *field.get_mut(&mut self.form) = value,
            Msg::SetEncryption(encryption) => self.form.wifi.encryption = encryption,
            Msg::ToggleHidden => self.form.wifi.hidden = !self.form.wifi.hidden,
            Msg::SetSize(value) => match value.parse() {
                Ok(size) => self.form.style.size = size,
                Err(_) => return false,
            },
            Msg::SetLevel(level) => self.form.style.level = level,
            Msg::ToggleMargin => self.form.style.margin = !self.form.style.margin,
            Msg::SetDotStyle(shape) => self.form.style.dots_pattern = shape,
            Msg::SetEyeStyle(shape) => self.form.style.eye_style = shape,
            Msg::SetGradient(gradient) => self.form.style.gradient_type = gradient,
            Msg::SetRotation(value) => match value.parse() {
                Ok(rotation) => self.form.style.gradient_rotation = rotation,
                Err(_) => return false,
            },
            Msg::LogoSelected(files) => {
                self.read_logo(files);
                return false;
            }
            Msg::SetLogo(logo) => self.form.style.logo = logo,
            Msg::Reset => {
                self.form = FormRecord {
                    kind: self.form.kind,
                    ..FormRecord::default()
                };
                self.notice = None;
            }
            Msg::SetSaveName(name) => self.save_name = name,
            Msg::Save => {
                let result = self.history.save(&self.form, &self.save_name).map(|_| ());
                if result.is_ok() {
                    self.save_name.clear();
                }
                self.report(result, "Saved to history");
            }
            Msg::Restore(id) => {
                if let Some(item) = self.history.get(&id) {
                    self.form = item.record().clone();
                    self.notice = Some("Configuration reloaded".to_owned());
                }
            }
            Msg::Rename(id, name) => {
                let result = self.history.rename(&id, &name);
                self.report(result, "Renamed");
            }
            Msg::Delete(id) => {
                let result = self.history.delete(&id);
                self.report(result, "Deleted");
            }
            Msg::ClearHistory => {
                let result = self.history.clear();
                self.report(result, "History cleared");
            }
            Msg::Download(format) => self.download(format),
            Msg::Exported(format, result) => self.exported(format, result),
            Msg::Ignore => return false,
        }
        true
    }

    fn change(&mut self, _props: Self::Properties) -> ShouldRender {
        false
    }

    fn view(&self) -> Html {
        let payload = encode(&self.form);
        let (svg, error) = if payload.is_empty() {
            (None, None)
        } else {
            match self
                .renderer
                .render_svg(&payload, &self.form.style, PREVIEW_SIZE)
            {
                Ok(svg) => (Some(svg), None),
                Err(err) => (None, Some(err.to_string())),
            }
        };
        let problems = validate(&self.form);
        let empty = payload.is_empty();

        html! {
            <div class="studio">
                <section class="controls">
                    <header>
                        <h1>{ "QR Studio" }</h1>
                        <button onclick=self.link.callback(|_| Msg::Reset) class="mdi-set mdi-refresh" title="Reset configuration to defaults"></button>
                    </header>
                    <nav class="types">
                        { for QrType::ALL.iter().map(|&kind| {
                            let class = if kind == self.form.kind { "type active" } else { "type" };
                            html! {
                                <button class=class onclick=self.link.callback(move |_| Msg::SetKind(kind))>
                                    { kind.label() }
                                </button>
                            }
                        }) }
                    </nav>
                    <fieldset class="payload">
                        { self.view_payload_fields() }
                    </fieldset>
                    { self.view_style_controls() }
                    <ul class="problems">
                        { for problems.iter().map(|problem| html! { <li>{ problem.to_string() }</li> }) }
                    </ul>
                </section>
                <section class="output">
                    <QrPreview svg=svg error=error background=self.form.style.bg_color.clone() />
                    <div class="export">
                        <button onclick=self.link.callback(|_| Msg::Download(ExportFormat::Png)) disabled={ empty }>{ "PNG" }</button>
                        <button onclick=self.link.callback(|_| Msg::Download(ExportFormat::Svg)) disabled={ empty }>{ "SVG" }</button>
                    </div>
                    <div class="save">
                        <input type="text" placeholder="e.g. Office Wi-Fi"
                            value=self.save_name.clone()
                            oninput=self.link.callback(|input: InputData| Msg::SetSaveName(input.value)) />
                        <button onclick=self.link.callback(|_| Msg::Save)
                            disabled={ !can_save(&self.save_name) }>
                            { "Save to History" }
                        </button>
                    </div>
                    <p class="notice">{ self.notice.clone().unwrap_or_default() }</p>
                </section>
                <HistoryPanel
                    items=self.history.items().to_vec()
                    onrestore=self.link.callback(Msg::Restore)
                    onrename=self.link.callback(|(id, name): (String, String)| Msg::Rename(id, name))
                    ondelete=self.link.callback(Msg::Delete)
                    onclear=self.link.callback(|_: ()| Msg::ClearHistory) />
            </div>
        }
    }
}
