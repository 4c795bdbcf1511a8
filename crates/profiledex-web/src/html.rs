pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>profiledex</title>
  <link rel="stylesheet" href="/assets/index.css">
</head>
<body>
  <header>
    <h1>Profiles</h1>
    <form id="controls">
      <input id="q" type="search" placeholder="Search name, traits, work..." autocomplete="off">
      <select id="fictional">
        <option value="all">All</option>
        <option value="true">Fictional</option>
        <option value="false">Real</option>
      </select>
      <select id="trait"><option value="">Any trait</option></select>
      <select id="hair_color"><option value="">Any hair color</option></select>
      <select id="sort">
        <option value="name">Name</option>
        <option value="braSize">Bra size</option>
        <option value="bust">Bust</option>
        <option value="waist">Waist</option>
        <option value="hips">Hips</option>
        <option value="height">Height</option>
        <option value="weight">Weight</option>
        <option value="traits">Traits</option>
      </select>
      <button id="direction" type="button" data-direction="asc">Asc</button>
      <select id="grid">
        <option value="1">1 column</option>
        <option value="2">2 columns</option>
        <option value="3" selected>3 columns</option>
        <option value="4">4 columns</option>
      </select>
    </form>
    <p id="status" role="status"></p>
  </header>
  <main id="cards" class="grid cols-3"></main>
  <script src="/assets/index.js"></script>
</body>
</html>
"#;

pub const INDEX_CSS: &str = r"
body { font-family: system-ui, sans-serif; margin: 0; background: #f6f6f8; color: #1d1d24; }
header { padding: 1rem 1.5rem; background: #fff; border-bottom: 1px solid #ddd; }
h1 { margin: 0 0 .75rem; font-size: 1.4rem; }
#controls { display: flex; flex-wrap: wrap; gap: .5rem; }
#controls input { flex: 1 1 16rem; }
#status { margin: .5rem 0 0; font-size: .85rem; color: #666; }
#status.degraded { color: #a35400; }
.grid { display: grid; gap: 1rem; padding: 1.5rem; }
.cols-1 { grid-template-columns: repeat(1, 1fr); }
.cols-2 { grid-template-columns: repeat(2, 1fr); }
.cols-3 { grid-template-columns: repeat(3, 1fr); }
.cols-4 { grid-template-columns: repeat(4, 1fr); }
.card { background: #fff; border-radius: 8px; padding: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,.08); }
.card img { width: 100%; aspect-ratio: 3 / 4; object-fit: cover; border-radius: 6px; }
.card h2 { font-size: 1.05rem; margin: .5rem 0 .25rem; }
.card .meta { font-size: .85rem; color: #555; }
.card .links a { margin-right: .5rem; font-size: .8rem; }
.card .traits span { display: inline-block; margin: .2rem .2rem 0 0; padding: .1rem .45rem; background: #eef; border-radius: 999px; font-size: .75rem; }
";

pub const INDEX_JS: &str = r#"
const controls = ["q", "fictional", "trait", "hair_color", "sort"];
const byId = (id) => document.getElementById(id);

function text(tag, value, className) {
  const el = document.createElement(tag);
  el.textContent = value;
  if (className) el.className = className;
  return el;
}

function card(profile) {
  const el = document.createElement("article");
  el.className = "card";
  const photo = profile.photo_url || profile.imageURL;
  if (photo) {
    const img = document.createElement("img");
    img.src = photo;
    img.alt = profile.name;
    img.loading = "lazy";
    el.appendChild(img);
  }
  el.appendChild(text("h2", profile.name));
  const display = profile.display || {};
  const parts = [];
  if (profile.braSize) parts.push(profile.braSize);
  if (display.measurements) parts.push(display.measurements);
  if (profile.hairColor) parts.push(profile.hairColor);
  if (parts.length) el.appendChild(text("p", parts.join(" · "), "meta"));
  if (profile.work) el.appendChild(text("p", profile.work, "meta"));
  if (profile.traits) {
    const traits = document.createElement("div");
    traits.className = "traits";
    profile.traits.split(";").forEach((t) => traits.appendChild(text("span", t)));
    el.appendChild(traits);
  }
  const links = Object.entries(display.links || {});
  if (links.length) {
    const row = document.createElement("div");
    row.className = "links";
    links.forEach(([platform, href]) => {
      const a = text("a", platform);
      a.href = href;
      a.target = "_blank";
      a.rel = "noopener noreferrer";
      row.appendChild(a);
    });
    el.appendChild(row);
  }
  return el;
}

function fillSelect(id, values) {
  const select = byId(id);
  const current = select.value;
  select.length = 1;
  values.forEach((v) => select.appendChild(new Option(v, v)));
  select.value = values.includes(current) ? current : "";
}

async function loadFacets() {
  const resp = await fetch("/api/facets");
  if (!resp.ok) return;
  const facets = await resp.json();
  fillSelect("trait", facets.traits);
  fillSelect("hair_color", facets.hair_colors);
}

async function render() {
  const params = new URLSearchParams();
  controls.forEach((id) => params.set(id, byId(id).value));
  params.set("direction", byId("direction").dataset.direction);
  const status = byId("status");
  const resp = await fetch(`/api/view?${params}`);
  const body = await resp.json();
  if (!resp.ok) {
    status.textContent = body.message;
    status.className = "degraded";
    return;
  }
  const cards = byId("cards");
  cards.replaceChildren(...body.profiles.map(card));
  status.textContent = `${body.count} of ${body.total}` +
    (body.source === "backend" ? "" : ` (${body.source}: ${body.warning || "offline"})`);
  status.className = body.source === "backend" ? "" : "degraded";
}

controls.forEach((id) => byId(id).addEventListener("input", render));
byId("direction").addEventListener("click", (event) => {
  const button = event.currentTarget;
  const next = button.dataset.direction === "asc" ? "desc" : "asc";
  button.dataset.direction = next;
  button.textContent = next === "asc" ? "Asc" : "Desc";
  render();
});
byId("grid").addEventListener("input", (event) => {
  byId("cards").className = `grid cols-${event.currentTarget.value}`;
});
byId("controls").addEventListener("submit", (event) => event.preventDefault());

loadFacets().then(render);
"#;
