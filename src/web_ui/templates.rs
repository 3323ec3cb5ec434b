//! Template engine setup and HTML templates.

use once_cell::sync::Lazy;
use tera::{Context, Tera};

/// Global template engine instance with embedded templates.
pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();

    // Embed templates directly in the binary (no external files needed)
    tera.add_raw_templates(vec![
        ("base.html", BASE_TEMPLATE),
        ("macros.html", MACROS_TEMPLATE),
        ("fonts.html", FONTS_TEMPLATE),
        ("font_new.html", FONT_NEW_TEMPLATE),
        ("font_edit.html", FONT_EDIT_TEMPLATE),
        ("error.html", ERROR_TEMPLATE),
    ])
    .expect("Failed to load templates");

    tera
});

/// Render a template with context
pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
    TEMPLATES.render(template, context)
}

// =============================================================================
// Admin stylesheet (served at ADMIN_STYLESHEET_PATH)
// =============================================================================

pub const ADMIN_CSS: &str = r#"#font-meta-box .font-upload-group {
    display: grid;
    grid-template-columns: 64px 1fr auto auto;
    gap: 12px;
    align-items: center;
    padding: 12px 20px;
    border-bottom: 1px solid var(--border-subtle);
}
#font-meta-box .font-upload-group label {
    font-size: 12px;
    font-weight: 600;
    letter-spacing: 0.05em;
    color: var(--foreground-secondary);
}
#font-meta-box .font-url {
    width: 100%;
    padding: 8px 12px;
    background: var(--bg);
    border: 1px solid var(--border);
    border-radius: 8px;
    color: var(--foreground);
    font-size: 13px;
}
#font-meta-box .font-preview {
    grid-column: 2 / -1;
    font-size: 12px;
    color: var(--foreground-tertiary);
}
#font-meta-box .font-preview:empty { display: none; }
#font-meta-box [hidden] { display: none !important; }
#font-meta-box .font-variation-group {
    margin: 16px 20px;
    border: 1px dashed var(--border);
    border-radius: 12px;
}
#font-meta-box .font-variation-group .group-actions {
    padding: 12px 20px;
    display: flex;
    justify-content: flex-end;
}
#font-meta-box .selectors {
    display: flex;
    gap: 24px;
    padding: 16px 20px;
    border-bottom: 1px solid var(--border-subtle);
}
#font-meta-box select,
.title-input {
    padding: 8px 12px;
    background: var(--bg);
    border: 1px solid var(--border);
    border-radius: 8px;
    color: var(--foreground);
    font-size: 14px;
}
.title-input { width: 100%; font-size: 18px; margin-bottom: 24px; }
#font-picker {
    margin: auto;
    width: min(640px, 90vw);
    background: var(--bg-secondary);
    color: var(--foreground);
    border: 1px solid var(--border);
    border-radius: 16px;
    padding: 0;
}
#font-picker::backdrop { background: rgba(0, 0, 0, 0.6); }
#font-picker .picker-list {
    max-height: 320px;
    overflow-y: auto;
    list-style: none;
}
#font-picker .picker-list label {
    display: flex;
    gap: 12px;
    padding: 10px 20px;
    cursor: pointer;
}
#font-picker .picker-footer {
    padding: 16px 20px;
    border-top: 1px solid var(--border-subtle);
    display: flex;
    gap: 12px;
    align-items: center;
    justify-content: space-between;
}
.notice {
    padding: 12px 20px;
    margin-bottom: 24px;
    border-radius: 12px;
    background: rgba(34, 197, 94, 0.15);
    color: #4ade80;
}
"#;

// =============================================================================
// Embedded Templates - Dark Mode Admin Design
// =============================================================================

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Font Manager{% endblock %}</title>
    <style>
        :root {
            --bg: #0a0a0a;
            --bg-secondary: #141414;
            --foreground: #fafafa;
            --foreground-secondary: rgba(250, 250, 250, 0.7);
            --foreground-tertiary: rgba(250, 250, 250, 0.4);
            --border: #262626;
            --border-subtle: #1a1a1a;
        }

        * { box-sizing: border-box; margin: 0; padding: 0; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            background: var(--bg);
            color: var(--foreground);
            line-height: 1.6;
            -webkit-font-smoothing: antialiased;
        }

        a {
            color: var(--foreground);
            text-decoration: none;
            transition: opacity 0.15s;
        }
        a:hover { opacity: 0.7; }

        .header {
            border-bottom: 1px solid var(--border-subtle);
            padding: 20px 32px;
        }
        .header-content {
            max-width: 1200px;
            margin: 0 auto;
            display: flex;
            align-items: center;
            justify-content: space-between;
        }
        .logo {
            font-size: 18px;
            font-weight: 600;
            letter-spacing: -0.02em;
        }
        .nav { display: flex; gap: 32px; }
        .nav a { color: var(--foreground-secondary); font-size: 14px; }
        .nav a:hover { color: var(--foreground); opacity: 1; }
        .menu-icon { display: inline-block; width: 1.2em; margin-right: 6px; font-weight: 700; text-align: center; }

        .container {
            max-width: 1200px;
            margin: 0 auto;
            padding: 48px 32px;
        }

        h1 {
            font-size: 32px;
            font-weight: 600;
            letter-spacing: -0.02em;
            margin-bottom: 32px;
        }
        h2 {
            font-size: 14px;
            font-weight: 500;
            color: var(--foreground-secondary);
            text-transform: uppercase;
            letter-spacing: 0.05em;
        }

        .card {
            background: var(--bg-secondary);
            border: 1px solid var(--border);
            border-radius: 16px;
            overflow: hidden;
        }
        .card + .card { margin-top: 24px; }

        .list { list-style: none; }
        .list-item {
            padding: 16px 20px;
            border-bottom: 1px solid var(--border-subtle);
            display: flex;
            align-items: center;
            gap: 16px;
        }
        .list-item:last-child { border-bottom: none; }
        .list-item:hover { background: rgba(255, 255, 255, 0.02); }
        .list-item a { flex: 1; }

        .badge {
            font-size: 11px;
            font-weight: 500;
            padding: 4px 10px;
            border-radius: 100px;
            background: var(--border);
            color: var(--foreground-secondary);
            text-transform: uppercase;
            letter-spacing: 0.02em;
        }

        .btn {
            display: inline-flex;
            align-items: center;
            gap: 8px;
            padding: 8px 18px;
            border-radius: 100px;
            font-size: 14px;
            font-weight: 500;
            border: none;
            cursor: pointer;
        }
        .btn-primary { background: var(--foreground); color: var(--bg); }
        .btn-primary:hover { opacity: 0.9; }
        .btn-primary:disabled { opacity: 0.4; cursor: default; }
        .btn-secondary {
            background: transparent;
            border: 1px solid var(--border);
            color: var(--foreground);
        }
        .btn-secondary:hover { border-color: var(--foreground-tertiary); }
        .btn-danger {
            background: transparent;
            border: 1px solid rgba(239, 68, 68, 0.4);
            color: #f87171;
        }

        .section-header {
            padding: 16px 20px;
            border-bottom: 1px solid var(--border-subtle);
            display: flex;
            align-items: center;
            justify-content: space-between;
        }

        .empty {
            text-align: center;
            padding: 64px 32px;
            color: var(--foreground-tertiary);
        }

        .text-secondary { color: var(--foreground-secondary); }
        .text-tertiary { color: var(--foreground-tertiary); }
        .text-sm { font-size: 13px; }
        .mt-4 { margin-top: 16px; }
        .mt-6 { margin-top: 24px; }
        .flex { display: flex; }
        .items-center { align-items: center; }
        .justify-between { justify-content: space-between; }
        .gap-3 { gap: 12px; }

        @media (max-width: 768px) {
            .header { padding: 16px 20px; }
            .container { padding: 32px 20px; }
            h1 { font-size: 24px; }
        }
    </style>
    {% for style in styles %}
    <link rel="stylesheet" id="{{ style.handle }}" href="{{ style.src }}?ver={{ style.version }}">
    {% endfor %}
</head>
<body>
    <header class="header">
        <div class="header-content">
            <a href="/admin/fonts" class="logo">Font Manager</a>
            <nav class="nav">
                {% for ctype in content_types %}{% if ctype.show_in_menu %}
                <a href="/admin/{{ ctype.slug }}s"><span class="menu-icon" aria-hidden="true">{{ ctype.menu_icon }}</span>{{ ctype.labels.name }}</a>
                {% endif %}{% endfor %}
            </nav>
        </div>
    </header>
    <main class="container">
        {% block content %}{% endblock %}
    </main>
</body>
</html>"##;

const MACROS_TEMPLATE: &str = r##"{% macro asset_slot(slot) %}
<div class="font-upload-group" data-format="{{ slot.format }}">
    <label>{{ slot.label }}</label>
    <input type="text" class="font-url" name="{{ slot.input_name }}" value="{{ slot.url }}" placeholder="No .{{ slot.format }} file selected">
    <button type="button" class="btn btn-secondary upload-font-button"{% if not slot.upload_visible %} hidden{% endif %}>Upload</button>
    <button type="button" class="btn btn-danger delete-font-button"{% if not slot.delete_visible %} hidden{% endif %}>Delete</button>
    <div class="font-preview">{% if slot.url %}{{ slot.url | split(pat="/") | last }}{% endif %}</div>
</div>
{% endmacro asset_slot %}"##;

const FONTS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ labels.name }} - Font Manager{% endblock %}
{% block content %}
{% if notice %}<div class="notice">{{ notice }}</div>{% endif %}
<div class="flex items-center justify-between" style="margin-bottom: 32px;">
    <h1 style="margin-bottom: 0;">{{ labels.name }}</h1>
    <a href="/admin/fonts/new" class="btn btn-primary">{{ labels.add_new }}</a>
</div>

<div class="card">
    {% if fonts %}
    <ul class="list">
        {% for font in fonts %}
        <li class="list-item">
            <a href="/admin/fonts/{{ font.id }}/edit">{% if font.title %}{{ font.title }}{% else %}(no title){% endif %}</a>
            <span class="badge">{{ font.weight }}</span>
            <span class="badge">{{ font.style }}</span>
            <span class="text-tertiary text-sm">{{ font.formats | join(sep=", ") }}</span>
            <form method="POST" action="/admin/fonts/{{ font.id }}/delete">
                <input type="hidden" name="_nonce" value="{{ font.delete_nonce }}">
                <button type="submit" class="btn btn-danger">Delete</button>
            </form>
        </li>
        {% endfor %}
    </ul>
    {% else %}
    <div class="empty">
        <p>{{ labels.not_found }}</p>
    </div>
    {% endif %}
</div>
{% endblock %}"##;

const FONT_NEW_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ labels.add_new_item }} - Font Manager{% endblock %}
{% block content %}
<h1>{{ labels.add_new_item }}</h1>
<form method="POST" action="/admin/fonts">
    <input type="hidden" name="_nonce" value="{{ nonce }}">
    <input type="text" name="post_title" class="title-input" placeholder="Add title" autofocus>
    <div class="flex gap-3">
        <a href="/admin/fonts" class="btn btn-secondary">Cancel</a>
        <button type="submit" class="btn btn-primary">Create</button>
    </div>
</form>
{% endblock %}"##;

const FONT_EDIT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% import "macros.html" as m %}
{% block title %}{{ labels.edit_item }} - Font Manager{% endblock %}
{% block content %}
{% if notice %}<div class="notice">{{ notice }}</div>{% endif %}
<div class="flex items-center justify-between" style="margin-bottom: 32px;">
    <h1 style="margin-bottom: 0;">{{ labels.edit_item }}</h1>
    <form method="POST" action="/admin/fonts/{{ font.id }}/delete">
        <input type="hidden" name="_nonce" value="{{ delete_nonce }}">
        <button type="submit" class="btn btn-danger">Delete</button>
    </form>
</div>

<form method="POST" action="/admin/fonts/{{ font.id }}">
    <input type="hidden" name="_nonce" value="{{ title_nonce }}">
    <input type="text" name="post_title" class="title-input" value="{{ font.title }}" placeholder="Add title">

    <div class="card" id="font-meta-box" data-media-nonce="{{ media_nonce }}">
        <div class="section-header">
            <h2>{{ editor.box_title }}</h2>
        </div>
        <input type="hidden" name="{{ editor.nonce_field }}" value="{{ editor.nonce }}">

        <div class="selectors">
            <label class="text-secondary text-sm">Font Weight
                <select name="{{ editor.weight_field }}">
                    {% for option in editor.weights %}
                    <option value="{{ option.value }}"{% if option.selected %} selected{% endif %}>{{ option.label }}</option>
                    {% endfor %}
                </select>
            </label>
            <label class="text-secondary text-sm">Font Style
                <select name="{{ editor.style_field }}">
                    {% for option in editor.styles %}
                    <option value="{{ option.value }}"{% if option.selected %} selected{% endif %}>{{ option.label }}</option>
                    {% endfor %}
                </select>
            </label>
        </div>

        <div class="font-base-group">
            {% for slot in editor.slots %}{{ m::asset_slot(slot=slot) }}{% endfor %}
        </div>

        <div id="additional-font-files-container"></div>

        <div class="section-header">
            <button type="button" class="btn btn-secondary" id="add-font-variation">Add Font Variations</button>
            <button type="submit" class="btn btn-primary">Update</button>
        </div>
    </div>
</form>

<template id="font-group-template">
    <div class="font-variation-group">
        {% for slot in editor.group_template %}{{ m::asset_slot(slot=slot) }}{% endfor %}
        <div class="group-actions">
            <button type="button" class="btn btn-danger delete-group-button">Delete Group</button>
        </div>
    </div>
</template>

<dialog id="font-picker">
    <div class="section-header">
        <h2>Select a Font</h2>
        <button type="button" class="btn btn-secondary picker-cancel">Close</button>
    </div>
    <ul class="picker-list"></ul>
    <div class="picker-footer">
        <label class="text-secondary text-sm">Upload new file
            <input type="file" class="picker-upload" accept="{{ accept }}">
        </label>
        <span class="picker-status text-tertiary text-sm" title="Allowed types: {{ allowed_types }}"></span>
        <button type="button" class="btn btn-primary picker-confirm" disabled>Use this font</button>
    </div>
</dialog>

<script>
(function () {
    var box = document.getElementById('font-meta-box');
    var container = document.getElementById('additional-font-files-container');
    var groupTemplate = document.getElementById('font-group-template');
    var picker = document.getElementById('font-picker');
    var list = picker.querySelector('.picker-list');
    var status = picker.querySelector('.picker-status');
    var confirmButton = picker.querySelector('.picker-confirm');
    var uploadInput = picker.querySelector('.picker-upload');
    var mediaNonce = box.dataset.mediaNonce;
    var pendingSlot = null;
    var chosen = null;

    function extension(filename) {
        return filename.split('.').pop().toLowerCase();
    }

    function setSlotUrl(slot, url) {
        slot.querySelector('.font-url').value = url;
        slot.querySelector('.upload-font-button').hidden = url !== '';
        slot.querySelector('.delete-font-button').hidden = url === '';
        slot.querySelector('.font-preview').textContent = url ? url.split('/').pop() : '';
    }

    function choose(item) {
        chosen = item;
        confirmButton.disabled = false;
    }

    function renderMedia(items) {
        list.textContent = '';
        if (items.length === 0) {
            status.textContent = 'No files uploaded yet.';
        }
        items.forEach(function (item) {
            var li = document.createElement('li');
            var label = document.createElement('label');
            var radio = document.createElement('input');
            radio.type = 'radio';
            radio.name = 'picker-choice';
            radio.addEventListener('change', function () { choose(item); });
            label.appendChild(radio);
            label.appendChild(document.createTextNode(item.filename));
            li.appendChild(label);
            list.appendChild(li);
        });
    }

    function loadMedia() {
        status.textContent = '';
        fetch('/admin/media.json')
            .then(function (res) { return res.json(); })
            .then(renderMedia)
            .catch(function () { status.textContent = 'Could not load the media library.'; });
    }

    function openPicker(slot) {
        pendingSlot = slot;
        chosen = null;
        confirmButton.disabled = true;
        loadMedia();
        picker.showModal();
    }

    confirmButton.addEventListener('click', function () {
        var slot = pendingSlot;
        var item = chosen;
        picker.close();
        if (!slot || !item) {
            return;
        }
        var expected = slot.dataset.format;
        if (extension(item.filename) !== expected) {
            alert('Invalid file type! Please upload a .' + expected + ' file.');
            return;
        }
        setSlotUrl(slot, item.url);
    });

    picker.querySelector('.picker-cancel').addEventListener('click', function () {
        picker.close();
    });

    picker.addEventListener('close', function () {
        pendingSlot = null;
        chosen = null;
        uploadInput.value = '';
    });

    uploadInput.addEventListener('change', function () {
        var file = uploadInput.files[0];
        if (!file) {
            return;
        }
        status.textContent = 'Uploading ' + file.name + '...';
        var url = '/admin/media?filename=' + encodeURIComponent(file.name) +
            '&_nonce=' + encodeURIComponent(mediaNonce);
        fetch(url, { method: 'POST', body: file })
            .then(function (res) {
                if (!res.ok) {
                    return res.text().then(function (text) { throw new Error(text); });
                }
                return res.json();
            })
            .then(function (item) {
                status.textContent = 'Uploaded ' + item.filename;
                fetch('/admin/media.json')
                    .then(function (res) { return res.json(); })
                    .then(function (items) {
                        renderMedia(items);
                        var radio = list.querySelector('input[type=radio]');
                        if (radio && items.length && items[0].id === item.id) {
                            radio.checked = true;
                        }
                        choose(item);
                    });
            })
            .catch(function (err) { status.textContent = err.message || 'Upload failed.'; });
    });

    box.addEventListener('click', function (event) {
        var target = event.target;
        if (target.classList.contains('upload-font-button')) {
            openPicker(target.closest('.font-upload-group'));
        } else if (target.classList.contains('delete-font-button')) {
            setSlotUrl(target.closest('.font-upload-group'), '');
        } else if (target.classList.contains('delete-group-button')) {
            target.closest('.font-variation-group').remove();
        } else if (target.id === 'add-font-variation') {
            container.appendChild(groupTemplate.content.cloneNode(true));
        }
    });
})();
</script>
{% endblock %}"##;

const ERROR_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Error - Font Manager{% endblock %}
{% block content %}
<div class="card">
    <div style="padding: 48px; text-align: center;">
        <h1 style="margin-bottom: 16px;">Something went wrong</h1>
        <p class="text-secondary">{{ message }}</p>
        <a href="/admin/fonts" class="btn btn-secondary mt-6">Back to fonts</a>
    </div>
</div>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        for name in ["base.html", "macros.html", "fonts.html", "font_new.html", "font_edit.html", "error.html"] {
            assert!(TEMPLATES.get_template_names().any(|n| n == name), "missing {}", name);
        }
    }

    #[test]
    fn test_editor_script_hooks_match_markup() {
        let (markup, script) = FONT_EDIT_TEMPLATE.split_once("<script>").unwrap();

        // Slot controls are emitted by the macro and looked up by the script
        for class in ["font-url", "font-preview", "upload-font-button", "delete-font-button"] {
            assert!(MACROS_TEMPLATE.contains(class), "macro lacks {}", class);
            assert!(script.contains(class), "script lacks {}", class);
        }
        assert!(MACROS_TEMPLATE.contains(r#"<div class="font-upload-group" data-format="{{ slot.format }}">"#));
        assert!(script.contains("closest('.font-upload-group')"));
        assert!(script.contains("slot.dataset.format"));

        // Group controls live in the page's group template
        for class in ["font-variation-group", "delete-group-button"] {
            assert!(markup.contains(class), "markup lacks {}", class);
            assert!(script.contains(class), "script lacks {}", class);
        }
        assert!(markup.contains(r#"id="font-group-template""#));
        assert!(script.contains("font-group-template"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let mut context = Context::new();
        context.insert("styles", &Vec::<String>::new());
        context.insert("content_types", &Vec::<String>::new());
        context.insert("message", "<b>nope</b>");

        let html = render("error.html", &context).unwrap();
        assert!(html.contains("&lt;b&gt;nope&lt;&#x2F;b&gt;"));
        assert!(!html.contains("<b>nope"));
    }
}
