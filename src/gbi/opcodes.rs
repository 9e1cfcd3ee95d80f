// Opcode numbers. RDP commands are shared by every microcode; the RSP
// commands move around between families.

// RDP
pub const G_NOOP: u8 = 0xC0;
pub const G_TRI_FILL: u8 = 0xC8;
pub const G_TRI_SHADE_TXTR_ZBUFF: u8 = 0xCF;
pub const G_TEXRECT: u8 = 0xE4;
pub const G_TEXRECTFLIP: u8 = 0xE5;
pub const G_RDPLOADSYNC: u8 = 0xE6;
pub const G_RDPPIPESYNC: u8 = 0xE7;
pub const G_RDPTILESYNC: u8 = 0xE8;
pub const G_RDPFULLSYNC: u8 = 0xE9;
pub const G_SETKEYGB: u8 = 0xEA;
pub const G_SETKEYR: u8 = 0xEB;
pub const G_SETCONVERT: u8 = 0xEC;
pub const G_SETSCISSOR: u8 = 0xED;
pub const G_SETPRIMDEPTH: u8 = 0xEE;
pub const G_RDPSETOTHERMODE: u8 = 0xEF;
pub const G_LOADTLUT: u8 = 0xF0;
pub const G_SETTILESIZE: u8 = 0xF2;
pub const G_LOADBLOCK: u8 = 0xF3;
pub const G_LOADTILE: u8 = 0xF4;
pub const G_SETTILE: u8 = 0xF5;
pub const G_FILLRECT: u8 = 0xF6;
pub const G_SETFILLCOLOR: u8 = 0xF7;
pub const G_SETFOGCOLOR: u8 = 0xF8;
pub const G_SETBLENDCOLOR: u8 = 0xF9;
pub const G_SETPRIMCOLOR: u8 = 0xFA;
pub const G_SETENVCOLOR: u8 = 0xFB;
pub const G_SETCOMBINE: u8 = 0xFC;
pub const G_SETTIMG: u8 = 0xFD;
pub const G_SETZIMG: u8 = 0xFE;
pub const G_SETCIMG: u8 = 0xFF;

// Fast3D / F3DEX (GBI0, GBI1)
pub const G_SPNOOP: u8 = 0x00;
pub const G_MTX: u8 = 0x01;
pub const G_MOVEMEM: u8 = 0x03;
pub const G_VTX: u8 = 0x04;
pub const G_DL: u8 = 0x06;
pub const G_LOAD_UCODE: u8 = 0xAF;
pub const G_BRANCH_Z: u8 = 0xB0;
pub const G_TRI2: u8 = 0xB1;
pub const G_MODIFYVTX: u8 = 0xB2;
pub const G_RDPHALF_2: u8 = 0xB3;
pub const G_RDPHALF_1: u8 = 0xB4;
pub const G_QUAD: u8 = 0xB5;
pub const G_CLEARGEOMETRYMODE: u8 = 0xB6;
pub const G_SETGEOMETRYMODE: u8 = 0xB7;
pub const G_ENDDL: u8 = 0xB8;
pub const G_SETOTHERMODE_L: u8 = 0xB9;
pub const G_SETOTHERMODE_H: u8 = 0xBA;
pub const G_TEXTURE: u8 = 0xBB;
pub const G_MOVEWORD: u8 = 0xBC;
pub const G_POPMTX: u8 = 0xBD;
pub const G_CULLDL: u8 = 0xBE;
pub const G_TRI1: u8 = 0xBF;

// F3DEX2 (GBI2)
pub const G_GBI2_NOOP: u8 = 0x00;
pub const G_GBI2_VTX: u8 = 0x01;
pub const G_GBI2_MODIFYVTX: u8 = 0x02;
pub const G_GBI2_CULLDL: u8 = 0x03;
pub const G_GBI2_BRANCH_Z: u8 = 0x04;
pub const G_GBI2_TRI1: u8 = 0x05;
pub const G_GBI2_TRI2: u8 = 0x06;
pub const G_GBI2_QUAD: u8 = 0x07;
pub const G_GBI2_TEXTURE: u8 = 0xD7;
pub const G_GBI2_POPMTX: u8 = 0xD8;
pub const G_GBI2_GEOMETRYMODE: u8 = 0xD9;
pub const G_GBI2_MTX: u8 = 0xDA;
pub const G_GBI2_MOVEWORD: u8 = 0xDB;
pub const G_GBI2_MOVEMEM: u8 = 0xDC;
pub const G_GBI2_LOAD_UCODE: u8 = 0xDD;
pub const G_GBI2_DL: u8 = 0xDE;
pub const G_GBI2_ENDDL: u8 = 0xDF;
pub const G_GBI2_SPNOOP: u8 = 0xE0;
pub const G_GBI2_RDPHALF_1: u8 = 0xE1;
pub const G_GBI2_SETOTHERMODE_L: u8 = 0xE2;
pub const G_GBI2_SETOTHERMODE_H: u8 = 0xE3;
pub const G_GBI2_RDPHALF_2: u8 = 0xF1;

// G_MOVEWORD indices
pub const G_MW_MATRIX: u32 = 0x00;
pub const G_MW_NUMLIGHT: u32 = 0x02;
pub const G_MW_CLIP: u32 = 0x04;
pub const G_MW_SEGMENT: u32 = 0x06;
pub const G_MW_FOG: u32 = 0x08;
pub const G_MW_LIGHTCOL: u32 = 0x0A;
pub const G_MW_POINTS: u32 = 0x0C;
pub const G_MW_PERSPNORM: u32 = 0x0E;

// G_MOVEMEM types, Fast3D numbering
pub const G_MV_VIEWPORT: u32 = 0x80;
pub const G_MV_LOOKATY: u32 = 0x82;
pub const G_MV_LOOKATX: u32 = 0x84;
pub const G_MV_L0: u32 = 0x86;
pub const G_MV_L7: u32 = 0x94;

// G_MOVEMEM indices, F3DEX2 numbering
pub const G_GBI2_MV_VIEWPORT: u32 = 8;
pub const G_GBI2_MV_LIGHT: u32 = 10;
pub const G_GBI2_MV_MATRIX: u32 = 14;

// G_DL push flag
pub const G_DL_PUSH: u32 = 0x00;
pub const G_DL_NOPUSH: u32 = 0x01;
