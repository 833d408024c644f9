/// How often the page asks the server for a fresh aggregate.
const PAGE_REFRESH_MS: u64 = 15_000;

pub fn render_index() -> String {
    INDEX_HTML.replace("{{REFRESH_MS}}", &PAGE_REFRESH_MS.to_string())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Check-in Dashboard</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef3f8;
      --bg-2: #c9dcef;
      --ink: #23262b;
      --accent: #1f7a8c;
      --accent-2: #2f4858;
      --gold: #d99a20;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e3ecf5 60%, #f4f7fa 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1120px, 100%);
      margin: 0 auto;
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.25rem;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
    }

    .filters {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    .filters label {
      display: grid;
      gap: 4px;
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #8b857d;
    }

    select {
      min-width: 180px;
      padding: 8px 12px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      font: inherit;
      background: white;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat .note {
      font-size: 0.85rem;
      color: #6f6a65;
    }

    .winner {
      border-radius: 18px;
      padding: 18px 22px;
      background: linear-gradient(120deg, #fff4d6, #ffe3a3);
      border: 1px solid rgba(217, 154, 32, 0.4);
      font-weight: 600;
    }

    .winner[hidden] {
      display: none;
    }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(320px, 1fr));
      gap: 20px;
    }

    .chart-card {
      background: white;
      border-radius: 20px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .bar-row {
      display: grid;
      grid-template-columns: 150px 1fr 90px;
      align-items: center;
      gap: 10px;
      font-size: 0.9rem;
      margin-bottom: 8px;
    }

    .bar-track {
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
      height: 12px;
      overflow: hidden;
    }

    .bar {
      height: 100%;
      background: var(--accent);
      border-radius: 999px;
    }

    .bar.done {
      background: var(--gold);
    }

    .bar-value {
      text-align: right;
      color: #6b645d;
    }

    table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.9rem;
    }

    th, td {
      text-align: left;
      padding: 8px 10px;
      border-bottom: 1px solid rgba(47, 72, 88, 0.08);
    }

    th {
      color: #8b857d;
      text-transform: uppercase;
      font-size: 0.75rem;
      letter-spacing: 0.1em;
    }

    .table-card {
      max-height: 420px;
      overflow: auto;
    }

    .status {
      font-size: 0.95rem;
      color: #6b645d;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
      .bar-row {
        grid-template-columns: 100px 1fr 70px;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Check-in Dashboard</h1>
      <p class="subtitle">Live attendance against unit targets, refreshed automatically.</p>
    </header>

    <section class="filters">
      <label>Date <select id="filter-date"><option value="all">All dates</option></select></label>
      <label>Session <select id="filter-session"><option value="all">All sessions</option></select></label>
      <label>Unit <select id="filter-unit"><option value="all">All units</option></select></label>
    </section>

    <div class="status" id="status"></div>

    <div class="winner" id="winner" hidden></div>

    <section class="panel">
      <div class="stat">
        <span class="label">Check-ins</span>
        <span class="value" id="kpi-checkins">0</span>
      </div>
      <div class="stat">
        <span class="label">Unique attendees</span>
        <span class="value" id="kpi-unique">0</span>
      </div>
      <div class="stat">
        <span class="label">Top day</span>
        <span class="value" id="kpi-top-day">-</span>
        <span class="note" id="kpi-top-day-note"></span>
      </div>
      <div class="stat">
        <span class="label">Top unit</span>
        <span class="value" id="kpi-top-unit">-</span>
        <span class="note" id="kpi-top-unit-note"></span>
      </div>
      <div class="stat">
        <span class="label">Not checked in</span>
        <span class="value" id="kpi-absent">0</span>
      </div>
    </section>

    <section class="charts">
      <div class="chart-card">
        <h2>Attendance by date</h2>
        <div id="chart-dates"></div>
      </div>
      <div class="chart-card">
        <h2>Units against target</h2>
        <div id="chart-units"></div>
      </div>
    </section>

    <section class="charts">
      <div class="chart-card table-card">
        <h2>Checked in</h2>
        <table>
          <thead><tr><th>ID</th><th>Name</th><th>Unit</th><th>Date</th><th>Session</th></tr></thead>
          <tbody id="table-present"></tbody>
        </table>
      </div>
      <div class="chart-card table-card">
        <h2>Not checked in</h2>
        <table>
          <thead><tr><th>ID</th><th>Name</th><th>Unit</th><th>Placement</th></tr></thead>
          <tbody id="table-absent"></tbody>
        </table>
      </div>
    </section>
  </main>

  <script>
    const REFRESH_MS = {{REFRESH_MS}};
    const statusEl = document.getElementById('status');
    const winnerEl = document.getElementById('winner');
    const selects = {
      date: document.getElementById('filter-date'),
      session: document.getElementById('filter-session'),
      unit: document.getElementById('filter-unit')
    };

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const text = (value) => (value === null || value === undefined || value === '' ? '-' : String(value));

    const escapeHtml = (value) => text(value)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;');

    const fillSelect = (select, values, allLabel) => {
      const current = select.value;
      select.innerHTML = '';
      [['all', allLabel], ...values.map((v) => [v, v])].forEach(([value, label]) => {
        const option = document.createElement('option');
        option.value = value;
        option.textContent = label;
        select.appendChild(option);
      });
      select.value = values.includes(current) ? current : 'all';
    };

    const bars = (rows) => {
      const max = Math.max(1, ...rows.map((row) => row.width));
      return rows.map((row) => `
        <div class="bar-row">
          <span>${escapeHtml(row.label)}</span>
          <div class="bar-track"><div class="bar ${row.done ? 'done' : ''}" style="width:${Math.min(100, (row.width / max) * 100)}%"></div></div>
          <span class="bar-value">${escapeHtml(row.value)}</span>
        </div>`).join('');
    };

    const render = (payload) => {
      const stats = payload.stats;
      document.getElementById('kpi-checkins').textContent = stats.total_checkins;
      document.getElementById('kpi-unique').textContent = stats.unique_attendees;
      document.getElementById('kpi-top-day').textContent = text(stats.top_day && stats.top_day.date);
      document.getElementById('kpi-top-day-note').textContent = stats.top_day ? `${stats.top_day.count} attendees` : '';
      document.getElementById('kpi-top-unit').textContent = text(stats.top_unit && stats.top_unit.unit);
      document.getElementById('kpi-top-unit-note').textContent = stats.top_unit ? `${stats.top_unit.percentage}% of target` : '';
      document.getElementById('kpi-absent').textContent = stats.absentees.length;

      document.getElementById('chart-dates').innerHTML = bars(stats.by_date.map((d) => ({
        label: d.date, width: d.count, value: d.count
      })));
      document.getElementById('chart-units').innerHTML = bars(stats.by_unit.map((u) => ({
        label: u.unit, width: u.percentage, value: `${u.count}/${u.target} (${u.percentage}%)`, done: u.percentage >= 100
      })));

      document.getElementById('table-present').innerHTML = stats.filtered.map((r) => `
        <tr><td>${escapeHtml(r.employee_id)}</td><td>${escapeHtml(r.name)}</td><td>${escapeHtml(r.unit)}</td><td>${escapeHtml(r.date)}</td><td>${escapeHtml(r.session)}</td></tr>`).join('');
      document.getElementById('table-absent').innerHTML = stats.absentees.map((r) => `
        <tr><td>${escapeHtml(r.employee_id)}</td><td>${escapeHtml(r.name)}</td><td>${escapeHtml(r.unit)}</td><td>${escapeHtml(r.placement)}</td></tr>`).join('');

      if (payload.winner) {
        const when = new Date(payload.winner.locked_at).toLocaleString();
        winnerEl.textContent = `First to reach target (${payload.session}): ${payload.winner.unit} at ${payload.winner.percentage}%, ${when}`;
        winnerEl.hidden = false;
      } else {
        winnerEl.hidden = true;
      }

      if (payload.sync.last_error) {
        setStatus(`Refresh failed: ${payload.sync.last_error}`, 'error');
      } else if (payload.sync.last_synced_at) {
        setStatus(`Updated ${new Date(payload.sync.last_synced_at).toLocaleTimeString()}`, 'ok');
      } else {
        setStatus('Waiting for first sync...', 'info');
      }
    };

    const loadFilters = async () => {
      const res = await fetch('/api/filters');
      if (!res.ok) {
        throw new Error('Unable to load filters');
      }
      const options = await res.json();
      fillSelect(selects.date, options.dates, 'All dates');
      fillSelect(selects.session, options.sessions, 'All sessions');
      fillSelect(selects.unit, options.units, 'All units');
    };

    const loadDashboard = async () => {
      const params = new URLSearchParams({
        date: selects.date.value,
        session: selects.session.value,
        unit: selects.unit.value
      });
      const res = await fetch(`/api/dashboard?${params}`);
      if (!res.ok) {
        throw new Error((await res.text()) || 'Unable to load dashboard');
      }
      render(await res.json());
    };

    const refresh = async () => {
      await loadFilters();
      await loadDashboard();
    };

    Object.values(selects).forEach((select) => {
      select.addEventListener('change', () => {
        loadDashboard().catch((err) => setStatus(err.message, 'error'));
      });
    });

    refresh().catch((err) => setStatus(err.message, 'error'));
    setInterval(() => refresh().catch((err) => setStatus(err.message, 'error')), REFRESH_MS);
  </script>
</body>
</html>
"#;
